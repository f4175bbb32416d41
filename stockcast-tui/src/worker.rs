//! Background worker thread: owns the pipeline; all fetching and fitting runs here.
//!
//! Communication with the TUI main thread is via `mpsc` channels. Each wake-up
//! drains the whole command queue and executes only the newest `Run`, so a
//! burst of input changes costs one pipeline pass.

use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use stockcast_core::forecast::ModelKind;
use stockcast_core::prepare::PreparedSeries;
use stockcast_core::resolve::{normalize_ticker, ResolveError, ResolvedInput};
use stockcast_runner::{save_artifacts, LoadError, LoadedPrices, Pipeline, PipelineError, RunOutput, RunRequest, Stage};

use crate::app::ErrorCategory;

/// Commands sent from the TUI to the worker.
#[derive(Debug)]
pub enum WorkerCommand {
    Run {
        generation: u64,
        request: RunRequest,
        model: ModelKind,
    },
    Export {
        output: Box<RunOutput>,
        dir: PathBuf,
    },
    Shutdown,
}

/// Responses sent from the worker back to the TUI.
#[derive(Debug)]
pub enum WorkerResponse {
    Validated {
        generation: u64,
        input: ResolvedInput,
    },
    Loaded {
        generation: u64,
        prices: Arc<LoadedPrices>,
        training: Arc<PreparedSeries>,
    },
    Completed {
        generation: u64,
        output: Box<RunOutput>,
    },
    Failed {
        generation: u64,
        failure: RunFailure,
    },
    Exported {
        dir: PathBuf,
    },
    ExportFailed {
        message: String,
    },
}

/// A pipeline error flattened for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunFailure {
    pub category: ErrorCategory,
    pub message: String,
    /// Normalized ticker when there is one, else the raw text.
    pub ticker: String,
    pub invalid_ticker: bool,
}

impl RunFailure {
    pub fn from_error(err: &PipelineError, raw_ticker: &str) -> Self {
        let category = match err {
            PipelineError::Resolve(ResolveError::InvalidTicker { .. }) => ErrorCategory::Ticker,
            PipelineError::Resolve(ResolveError::FetchFailed { .. }) => ErrorCategory::Network,
            PipelineError::Resolve(_) => ErrorCategory::Input,
            PipelineError::Load(LoadError::NoData { .. }) => ErrorCategory::Data,
            PipelineError::Load(LoadError::FetchFailed { .. }) => ErrorCategory::Network,
            PipelineError::Forecast(_) => ErrorCategory::Forecast,
            PipelineError::Fingerprint(_) => ErrorCategory::Other,
        };
        Self {
            category,
            message: err.to_string(),
            ticker: normalize_ticker(raw_ticker).unwrap_or_else(|| raw_ticker.trim().to_string()),
            invalid_ticker: err.is_invalid_ticker(),
        }
    }
}

/// What one drained queue boils down to.
#[derive(Debug, Default)]
pub struct Batch {
    /// The newest run request, if any.
    pub run: Option<(u64, RunRequest, ModelKind)>,
    /// Older run requests that will never execute.
    pub superseded: usize,
    pub exports: Vec<(Box<RunOutput>, PathBuf)>,
    pub shutdown: bool,
}

impl Batch {
    pub fn coalesce(commands: impl IntoIterator<Item = WorkerCommand>) -> Self {
        let mut batch = Batch::default();
        for cmd in commands {
            match cmd {
                WorkerCommand::Run {
                    generation,
                    request,
                    model,
                } => {
                    if batch.run.replace((generation, request, model)).is_some() {
                        batch.superseded += 1;
                    }
                }
                WorkerCommand::Export { output, dir } => batch.exports.push((output, dir)),
                WorkerCommand::Shutdown => batch.shutdown = true,
            }
        }
        batch
    }
}

/// Spawn the background worker thread. The worker owns `pipeline` from here on.
pub fn spawn_worker(
    pipeline: Pipeline,
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("stockcast-worker".into())
        .spawn(move || worker_loop(pipeline, rx, tx))
}

fn worker_loop(mut pipeline: Pipeline, rx: Receiver<WorkerCommand>, tx: Sender<WorkerResponse>) {
    tracing::info!(provider = pipeline.provider_name(), "worker started");
    while let Ok(first) = rx.recv() {
        let batch = Batch::coalesce(std::iter::once(first).chain(rx.try_iter()));
        if batch.superseded > 0 {
            tracing::debug!(skipped = batch.superseded, "superseded run requests dropped");
        }

        for (output, dir) in batch.exports {
            handle_export(&output, dir, &tx);
        }
        if batch.shutdown {
            break;
        }
        if let Some((generation, request, model)) = batch.run {
            handle_run(&mut pipeline, generation, &request, model, &tx);
        }
    }
    tracing::info!("worker stopped");
}

pub fn handle_run(
    pipeline: &mut Pipeline,
    generation: u64,
    request: &RunRequest,
    model: ModelKind,
    tx: &Sender<WorkerResponse>,
) {
    pipeline.set_model(model);
    let result = pipeline.run_with(request, |stage| {
        let resp = match stage {
            Stage::Validated(input) => WorkerResponse::Validated {
                generation,
                input: input.clone(),
            },
            Stage::Loaded { prices, training } => WorkerResponse::Loaded {
                generation,
                prices: Arc::clone(prices),
                training: Arc::clone(training),
            },
        };
        let _ = tx.send(resp);
    });

    let resp = match result {
        Ok(output) => WorkerResponse::Completed {
            generation,
            output: Box::new(output),
        },
        Err(e) => {
            tracing::warn!(generation, error = %e, "run failed");
            WorkerResponse::Failed {
                generation,
                failure: RunFailure::from_error(&e, request.choice.raw()),
            }
        }
    };
    let _ = tx.send(resp);
}

fn handle_export(output: &RunOutput, dir: PathBuf, tx: &Sender<WorkerResponse>) {
    let resp = match save_artifacts(output, &dir) {
        Ok(run_dir) => WorkerResponse::Exported { dir: run_dir },
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "export failed");
            WorkerResponse::ExportFailed {
                message: format!("{e:#}"),
            }
        }
    };
    let _ = tx.send(resp);
}
