//! Memoized forecast pipeline.
//!
//! Stages run in order and stop at the first failure:
//! validate (per ticker) → load (per ticker + range) → prepare (per loaded
//! table) → forecast (per ticker + range + horizon + model) → sentiment.
//!
//! Each stage keeps its own memo, so changing only the horizon re-runs only
//! the forecaster, and changing only the model re-runs only the forecaster.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use stockcast_core::data::DataProvider;
use stockcast_core::domain::{Forecast, Sentiment};
use stockcast_core::fingerprint::{RunFingerprint, RunInputs};
use stockcast_core::forecast::{AdditiveSettings, ForecastError, Forecaster, Horizon, ModelKind};
use stockcast_core::prepare::{prepare_series, PreparedSeries};
use stockcast_core::resolve::{check_input, probe, DateRange, ResolveError, ResolvedInput, TickerChoice};

use crate::data_loader::{LoadError, LoadKey, LoadedPrices, SessionCache};

/// Errors from a pipeline run. Every variant is shown to the user as-is.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("forecast failed: {0}")]
    Forecast(#[from] ForecastError),

    #[error("fingerprint failed: {0}")]
    Fingerprint(#[from] serde_json::Error),
}

impl PipelineError {
    /// True when the ticker failed validation (the UI then offers suggestions).
    pub fn is_invalid_ticker(&self) -> bool {
        matches!(self, PipelineError::Resolve(ResolveError::InvalidTicker { .. }))
    }
}

/// One user request: what to fetch and how far to forecast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRequest {
    pub choice: TickerChoice,
    pub range: DateRange,
    pub horizon: Horizon,
}

/// Everything one run produced.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub input: ResolvedInput,
    pub horizon: Horizon,
    pub model: ModelKind,
    pub prices: Arc<LoadedPrices>,
    pub training: Arc<PreparedSeries>,
    pub forecast: Arc<Forecast>,
    /// `None` only when either series is empty.
    pub sentiment: Option<Sentiment>,
    pub fingerprint: RunFingerprint,
}

/// Intermediate results, reported as soon as each stage completes.
#[derive(Debug)]
pub enum Stage<'a> {
    Validated(&'a ResolvedInput),
    Loaded {
        prices: &'a Arc<LoadedPrices>,
        training: &'a Arc<PreparedSeries>,
    },
}

type ForecastKey = (String, NaiveDate, NaiveDate, u32, String);

/// Counters for what actually ran (as opposed to memo hits).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub probes: usize,
    pub fits: usize,
}

pub struct Pipeline {
    provider: Arc<dyn DataProvider>,
    model: ModelKind,
    settings: AdditiveSettings,
    forecaster: Box<dyn Forecaster>,
    today: Option<NaiveDate>,
    probes: HashMap<String, Result<(), ResolveError>>,
    prices: SessionCache,
    training: HashMap<LoadKey, Arc<PreparedSeries>>,
    forecasts: HashMap<ForecastKey, Arc<Forecast>>,
    stats: PipelineStats,
}

impl Pipeline {
    pub fn new(provider: Arc<dyn DataProvider>, model: ModelKind, settings: AdditiveSettings) -> Self {
        let forecaster = model.build(&settings);
        Self {
            provider,
            model,
            settings,
            forecaster,
            today: None,
            probes: HashMap::new(),
            prices: SessionCache::new(),
            training: HashMap::new(),
            forecasts: HashMap::new(),
            stats: PipelineStats::default(),
        }
    }

    /// Replace the forecaster with an arbitrary implementation.
    ///
    /// The memo key uses the forecaster's name, so swapping in a differently
    /// named forecaster never serves stale results.
    pub fn with_forecaster(mut self, forecaster: Box<dyn Forecaster>) -> Self {
        self.forecaster = forecaster;
        self
    }

    /// Pin "today" (the probe window end). Defaults to the local date.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn model(&self) -> ModelKind {
        self.model
    }

    pub fn set_model(&mut self, model: ModelKind) {
        if model != self.model {
            tracing::info!(from = %self.model, to = %model, "switching forecast model");
            self.model = model;
            self.forecaster = model.build(&self.settings);
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn stats(&self) -> PipelineStats {
        self.stats
    }

    pub fn fetch_count(&self) -> usize {
        self.prices.fetch_count()
    }

    fn today(&self) -> NaiveDate {
        self.today
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    /// Normalize, range-check and probe. Probe outcomes are memoized per
    /// ticker, except transport failures.
    pub fn validate(&mut self, choice: &TickerChoice, range: DateRange) -> Result<ResolvedInput, PipelineError> {
        let ResolvedInput { ticker, range } = check_input(choice, range)?;

        let outcome = match self.probes.get(&ticker) {
            Some(memo) => {
                tracing::debug!(%ticker, "probe cache hit");
                memo.clone()
            }
            None => {
                self.stats.probes += 1;
                let outcome = probe(self.provider.as_ref(), &ticker, self.today());
                if !matches!(outcome, Err(ResolveError::FetchFailed { .. })) {
                    self.probes.insert(ticker.clone(), outcome.clone());
                }
                outcome
            }
        };
        if let Err(e) = outcome {
            tracing::warn!(%ticker, error = %e, "ticker rejected");
            return Err(e.into());
        }

        tracing::info!(%ticker, start = %range.start, end = %range.end, "ticker validated");
        Ok(ResolvedInput { ticker, range })
    }

    pub fn load(&mut self, input: &ResolvedInput) -> Result<Arc<LoadedPrices>, PipelineError> {
        Ok(self.prices.load(self.provider.as_ref(), &input.ticker, input.range)?)
    }

    /// Training series for a loaded table, derived once per table.
    pub fn prepare(&mut self, prices: &LoadedPrices) -> Arc<PreparedSeries> {
        Arc::clone(
            self.training
                .entry(prices.key())
                .or_insert_with(|| Arc::new(prepare_series(&prices.records))),
        )
    }

    pub fn forecast(
        &mut self,
        input: &ResolvedInput,
        training: &PreparedSeries,
        horizon: Horizon,
    ) -> Result<Arc<Forecast>, PipelineError> {
        let key = (
            input.ticker.clone(),
            input.range.start,
            input.range.end,
            horizon.years(),
            self.forecaster.name().to_string(),
        );
        if let Some(hit) = self.forecasts.get(&key) {
            tracing::debug!(ticker = %input.ticker, years = horizon.years(), "forecast cache hit");
            return Ok(Arc::clone(hit));
        }

        self.stats.fits += 1;
        let forecast = Arc::new(self.forecaster.forecast(&training.points, horizon.days())?);
        tracing::info!(
            ticker = %input.ticker,
            model = self.forecaster.name(),
            years = horizon.years(),
            points = forecast.points.len(),
            "forecast computed"
        );
        self.forecasts.insert(key, Arc::clone(&forecast));
        Ok(forecast)
    }

    pub fn run(&mut self, request: &RunRequest) -> Result<RunOutput, PipelineError> {
        self.run_with(request, |_| {})
    }

    /// Run every stage, calling `observe` as intermediate results become available.
    pub fn run_with<F>(&mut self, request: &RunRequest, mut observe: F) -> Result<RunOutput, PipelineError>
    where
        F: FnMut(Stage<'_>),
    {
        let input = self.validate(&request.choice, request.range)?;
        observe(Stage::Validated(&input));

        let prices = self.load(&input)?;
        let training = self.prepare(&prices);
        observe(Stage::Loaded {
            prices: &prices,
            training: &training,
        });

        let forecast = self.forecast(&input, &training, request.horizon)?;
        let sentiment = Sentiment::evaluate(&training.points, &forecast);

        let fingerprint = RunFingerprint::new(
            RunInputs {
                ticker: input.ticker.clone(),
                start: input.range.start,
                end: input.range.end,
                horizon_years: request.horizon.years(),
                model: self.model,
                settings: self.settings.clone(),
            },
            &prices.dataset_hash,
        )?;

        Ok(RunOutput {
            input,
            horizon: request.horizon,
            model: self.model,
            prices,
            training,
            forecast,
            sentiment,
            fingerprint,
        })
    }
}
