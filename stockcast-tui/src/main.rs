//! StockCast TUI binary: terminal setup, logging, worker spawn, event loop.

use std::fs::OpenOptions;
use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::EnvFilter;

use stockcast_runner::{Pipeline, StockcastConfig};
use stockcast_tui::app::{AppState, InputState};
use stockcast_tui::worker::{self, WorkerCommand};
use stockcast_tui::{input, persistence, ui};

#[derive(Parser)]
#[command(name = "stockcast-tui", about = "StockCast: interactive stock price forecasting dashboard")]
struct Args {
    /// Config file. Defaults to {config_dir}/stockcast/config.toml.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Use the offline synthetic provider instead of Yahoo Finance.
    #[arg(long, default_value_t = false)]
    synthetic: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = StockcastConfig::load(args.config.as_deref())?;

    // Logging needs `ui.log_file`, so the load is reported once the subscriber exists.
    if let Some(path) = config.log_file() {
        init_file_logging(&path)?;
    }
    match StockcastConfig::source_path(args.config.as_deref()) {
        Some(path) => tracing::info!(path = %path.display(), "config loaded"),
        None => tracing::info!("no config file, using defaults"),
    }

    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    let state_path = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("stockcast")
        .join("state.json");

    // Pipeline lives on the worker thread.
    let provider = config.build_provider(args.synthetic)?;
    let provider_name = provider.name().to_string();
    let pipeline = Pipeline::new(provider, config.forecast.model, config.forecast.settings());

    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();
    let worker_handle = worker::spawn_worker(pipeline, cmd_rx, resp_tx).context("failed to spawn worker thread")?;

    let today = chrono::Local::now().date_naive();
    let input_state = InputState::new(
        config.catalog(),
        config.data.default_start,
        today,
        config.default_horizon(),
    );
    let mut app = AppState::new(cmd_tx.clone(), resp_rx, input_state, config.forecast.model);
    app.tail_rows = config.ui.tail_rows;
    app.export_dir = config.ui.export_dir.clone();
    app.provider_name = provider_name;

    if let Some(persisted) = persistence::load(&state_path) {
        persistence::apply(&mut app, persisted);
    }
    tracing::info!(provider = %app.provider_name, "tui started");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    // Save state before exit
    if let Err(e) = persistence::save(&state_path, &persistence::extract(&app)) {
        tracing::warn!(error = %e, "failed to save session state");
    }

    // Shutdown worker
    let _ = cmd_tx.send(WorkerCommand::Shutdown);
    let _ = worker_handle.join();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut AppState) -> Result<()> {
    loop {
        // 1. Render
        terminal.draw(|f| ui::draw(f, app))?;

        // 2. Drain worker responses (non-blocking)
        while let Ok(resp) = app.worker_rx.try_recv() {
            app.handle_response(resp);
        }

        // 3. Poll for input events (50ms timeout for ~20 FPS tick)
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        // 4. Check quit
        if !app.running {
            break;
        }
    }
    Ok(())
}

/// Logs go to a file; anything written to stderr would corrupt the screen.
fn init_file_logging(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log dir: {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file: {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
