//! StockCast Runner: session cache, memoized pipeline, configuration, export.
//!
//! This crate builds on `stockcast-core` to provide:
//! - Price loading with a per-session (ticker, start, end) cache
//! - The stage-wise memoized `Pipeline` driven by the TUI worker and the CLI
//! - TOML configuration and provider construction
//! - CSV + JSON artifact export with run fingerprints

pub mod config;
pub mod data_loader;
pub mod export;
pub mod pipeline;

pub use config::{ConfigError, ProviderKind, StockcastConfig};
pub use data_loader::{load_prices, LoadError, LoadedPrices, SessionCache};
pub use export::{load_manifest, save_artifacts, RunManifest};
pub use pipeline::{Pipeline, PipelineError, PipelineStats, RunOutput, RunRequest, Stage};
