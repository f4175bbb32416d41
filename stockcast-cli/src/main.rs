//! StockCast CLI: ticker lookup, probe, fetch, and forecast commands.
//!
//! Commands:
//! - `tickers`: list the catalog, or suggestions for a query
//! - `validate`: probe a ticker the same way the dashboard does
//! - `fetch`: load prices and print the raw tail, shape, and training tail
//! - `forecast`: run the full pipeline for one or more tickers, optionally exporting artifacts

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use tracing_subscriber::EnvFilter;

use stockcast_core::data::{DataProvider, TickerCatalog};
use stockcast_core::domain::PRICE_COLUMNS;
use stockcast_core::forecast::{Horizon, ModelKind};
use stockcast_core::resolve::{DateRange, TickerChoice};
use stockcast_runner::{save_artifacts, Pipeline, PipelineError, RunOutput, RunRequest, StockcastConfig};

#[derive(Parser)]
#[command(name = "stockcast", about = "StockCast CLI: stock price forecasting from daily history")]
struct Cli {
    /// Config file. Defaults to {config_dir}/stockcast/config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Use the offline synthetic provider instead of Yahoo Finance.
    #[arg(long, global = true, default_value_t = false)]
    synthetic: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog tickers, or those matching QUERY by symbol or name.
    Tickers {
        query: Option<String>,
    },
    /// Probe a ticker over the last few days.
    Validate {
        ticker: String,
    },
    /// Fetch prices and print the raw tail and training tail.
    Fetch {
        ticker: String,

        /// Start date (YYYY-MM-DD). Defaults to data.default_start.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Rows of each tail to print. Defaults to ui.tail_rows.
        #[arg(long)]
        rows: Option<usize>,
    },
    /// Forecast one or more tickers.
    Forecast {
        #[arg(required = true)]
        tickers: Vec<String>,

        /// Start date (YYYY-MM-DD). Defaults to data.default_start.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Horizon in years (1-10). Defaults to forecast.default_years.
        #[arg(long)]
        years: Option<u32>,

        /// additive or drift. Defaults to forecast.model.
        #[arg(long)]
        model: Option<String>,

        /// Write CSV + manifest artifacts under this directory.
        #[arg(long)]
        export: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = StockcastConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Tickers { query } => run_tickers(&config.catalog(), query.as_deref()),
        Commands::Validate { ticker } => {
            let provider = config.build_provider(cli.synthetic)?;
            run_validate(&config, provider, &ticker)
        }
        Commands::Fetch {
            ticker,
            start,
            end,
            rows,
        } => {
            let provider = config.build_provider(cli.synthetic)?;
            let range = parse_range(&config, start.as_deref(), end.as_deref())?;
            run_fetch(&config, provider, &ticker, range, rows.unwrap_or(config.ui.tail_rows))
        }
        Commands::Forecast {
            tickers,
            start,
            end,
            years,
            model,
            export,
        } => {
            let provider = config.build_provider(cli.synthetic)?;
            let range = parse_range(&config, start.as_deref(), end.as_deref())?;
            let horizon = match years {
                Some(y) => Horizon::from_years(y)?,
                None => config.default_horizon(),
            };
            let model = match model {
                Some(m) => m.parse::<ModelKind>()?,
                None => config.forecast.model,
            };
            run_forecast(&config, provider, &tickers, range, horizon, model, export)
        }
    }
}

fn parse_date(s: Option<&str>, default: NaiveDate) -> Result<NaiveDate> {
    s.map(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d"))
        .transpose()
        .with_context(|| format!("invalid date {:?} (expected YYYY-MM-DD)", s.unwrap_or_default()))
        .map(|d| d.unwrap_or(default))
}

/// Start/end from flags or config defaults; an inverted range is rejected here.
fn parse_range(config: &StockcastConfig, start: Option<&str>, end: Option<&str>) -> Result<DateRange> {
    let start = parse_date(start, config.data.default_start)?;
    let end = parse_date(end, chrono::Local::now().date_naive())?;
    Ok(DateRange::new(start, end)?)
}

/// Listed when the symbol is in the catalog, custom otherwise.
fn choice_for(catalog: &TickerCatalog, ticker: &str) -> TickerChoice {
    match catalog.find(ticker.trim()) {
        Some(entry) => TickerChoice::Listed(entry.symbol.clone()),
        None => TickerChoice::Custom(ticker.to_string()),
    }
}

fn pipeline(config: &StockcastConfig, provider: Arc<dyn DataProvider>, model: ModelKind) -> Pipeline {
    Pipeline::new(provider, model, config.forecast.settings())
}

fn run_tickers(catalog: &TickerCatalog, query: Option<&str>) -> Result<()> {
    let entries: Vec<_> = match query {
        Some(q) => catalog.suggest(q),
        None => catalog.tickers.iter().collect(),
    };
    if entries.is_empty() {
        println!("No tickers match {:?}.", query.unwrap_or_default());
        return Ok(());
    }
    println!("{:<14} {}", "Symbol", "Name");
    println!("{}", "-".repeat(48));
    for t in entries {
        println!("{:<14} {}", t.symbol, t.name);
    }
    Ok(())
}

fn run_validate(config: &StockcastConfig, provider: Arc<dyn DataProvider>, ticker: &str) -> Result<()> {
    let mut pipeline = pipeline(config, provider, config.forecast.model);
    let today = chrono::Local::now().date_naive();
    let range = DateRange::new(today, today)?;
    match pipeline.validate(&choice_for(&config.catalog(), ticker), range) {
        Ok(input) => {
            println!("{}: valid", input.ticker);
            Ok(())
        }
        Err(e) => {
            eprintln!("{e}");
            if e.is_invalid_ticker() {
                print_suggestions(&config.catalog(), ticker);
            }
            std::process::exit(1);
        }
    }
}

fn run_fetch(
    config: &StockcastConfig,
    provider: Arc<dyn DataProvider>,
    ticker: &str,
    range: DateRange,
    rows: usize,
) -> Result<()> {
    let mut pipeline = pipeline(config, provider, config.forecast.model);
    let input = match pipeline.validate(&choice_for(&config.catalog(), ticker), range) {
        Ok(input) => input,
        Err(e) => fail(config, ticker, &e),
    };
    let prices = match pipeline.load(&input) {
        Ok(prices) => prices,
        Err(e) => fail(config, ticker, &e),
    };
    let training = pipeline.prepare(&prices);

    println!();
    println!("=== Raw data: {} ===", prices.ticker);
    println!(
        "{:<12} {:>10} {:>10} {:>10} {:>10} {:>10} {:>14}",
        PRICE_COLUMNS[0], PRICE_COLUMNS[1], PRICE_COLUMNS[2], PRICE_COLUMNS[3], PRICE_COLUMNS[4], PRICE_COLUMNS[5], PRICE_COLUMNS[6]
    );
    for r in prices.tail(rows) {
        println!(
            "{:<12} {:>10} {:>10} {:>10} {:>10} {:>10} {:>14}",
            r.date.to_string(),
            fmt_value(r.open),
            fmt_value(r.high),
            fmt_value(r.low),
            fmt_value(r.close),
            fmt_value(r.adjusted_close),
            r.volume
        );
    }
    let (n_rows, n_cols) = prices.shape();
    println!();
    println!("Data shape:     ({n_rows}, {n_cols})");
    println!("Columns:        {}", PRICE_COLUMNS.join(", "));
    println!("Source:         {}", prices.source.label());
    println!("Dataset hash:   {}", prices.dataset_hash);
    println!();
    println!("=== Training data ({} points, {} dropped) ===", training.points.len(), training.dropped());
    for p in training.tail(rows) {
        println!("{:<12} {:>10}", p.date.to_string(), fmt_value(p.value));
    }
    println!();
    Ok(())
}

fn run_forecast(
    config: &StockcastConfig,
    provider: Arc<dyn DataProvider>,
    tickers: &[String],
    range: DateRange,
    horizon: Horizon,
    model: ModelKind,
    export: Option<PathBuf>,
) -> Result<()> {
    let catalog = config.catalog();
    tracing::info!(
        tickers = tickers.len(),
        %model,
        years = horizon.years(),
        start = %range.start,
        end = %range.end,
        "forecast batch started"
    );

    // One pipeline per ticker: pipelines are single-owner and share only the provider.
    let results: Vec<(String, Result<RunOutput, PipelineError>)> = tickers
        .par_iter()
        .map(|ticker| {
            let mut p = pipeline(config, Arc::clone(&provider), model);
            let request = RunRequest {
                choice: choice_for(&catalog, ticker),
                range,
                horizon,
            };
            (ticker.clone(), p.run(&request))
        })
        .collect();

    let mut failed = 0usize;
    for (ticker, result) in &results {
        match result {
            Ok(output) => {
                print_summary(output, config.ui.tail_rows);
                if let Some(dir) = &export {
                    let run_dir = save_artifacts(output, dir)?;
                    tracing::info!(ticker = %output.input.ticker, dir = %run_dir.display(), "artifacts exported");
                    println!("Artifacts saved to: {}", run_dir.display());
                }
            }
            Err(e) => {
                failed += 1;
                eprintln!("Error for {}: {e}", ticker.trim());
                if e.is_invalid_ticker() {
                    print_suggestions(&catalog, ticker);
                }
            }
        }
    }

    if failed > 0 {
        tracing::warn!(failed, total = tickers.len(), "forecast batch had failures");
    }
    if failed == tickers.len() {
        bail!("no forecast succeeded");
    }
    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn fail(config: &StockcastConfig, ticker: &str, e: &PipelineError) -> ! {
    eprintln!("{e}");
    if e.is_invalid_ticker() {
        print_suggestions(&config.catalog(), ticker);
    }
    std::process::exit(1);
}

fn print_suggestions(catalog: &TickerCatalog, ticker: &str) {
    let matching = catalog.suggest(ticker);
    let entries: Vec<_> = if matching.is_empty() {
        catalog.tickers.iter().collect()
    } else {
        matching
    };
    eprintln!("Try one of:");
    for t in entries {
        eprintln!("  {}", t.label());
    }
}

fn fmt_value(v: f64) -> String {
    if v.is_finite() {
        format!("{v:.2}")
    } else {
        "NaN".to_string()
    }
}

fn print_summary(output: &RunOutput, tail: usize) {
    println!();
    println!("=== Forecast: {} ===", output.input.ticker);
    println!("Period:         {} to {}", output.input.range.start, output.input.range.end);
    println!("Source:         {}", output.prices.source.label());
    println!(
        "Rows:           {} ({} training, {} dropped)",
        output.prices.records.len(),
        output.training.points.len(),
        output.training.dropped()
    );
    println!("Model:          {}", output.forecast.model);
    println!(
        "Horizon:        {} year(s), {} days",
        output.horizon.years(),
        output.horizon.days()
    );
    println!("Forecast rows:  {}", output.forecast.points.len());
    match output.sentiment {
        Some(s) => {
            println!("Last value:     {}", fmt_value(s.current));
            println!("Predicted end:  {}", fmt_value(s.predicted));
            println!(
                "Future Sentiment: {} ({:+.1}%)",
                s.direction.label(),
                s.change_pct() * 100.0
            );
        }
        None => println!("Future Sentiment: n/a"),
    }
    println!("Run hash:       {}", output.fingerprint.run_hash);
    println!();
    println!("{:<12} {:>12} {:>12} {:>12}", "Date", "Predicted", "Lower", "Upper");
    println!("{}", "-".repeat(51));
    for p in output.forecast.tail(tail) {
        println!(
            "{:<12} {:>12} {:>12} {:>12}",
            p.date.to_string(),
            fmt_value(p.predicted_value),
            fmt_value(p.lower_bound),
            fmt_value(p.upper_bound)
        );
    }
    println!();
}
