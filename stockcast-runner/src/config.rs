//! TOML configuration shared by the TUI and CLI.
//!
//! Looked up at `--config PATH` if given, else `{config_dir}/stockcast/config.toml`,
//! else built-in defaults. Every section and key is optional; unknown keys are
//! rejected so typos fail loudly.
//!
//! ```toml
//! [data]
//! provider = "yahoo"          # or "synthetic"
//! timeout_secs = 30
//! default_start = "2020-01-01"
//!
//! [forecast]
//! model = "additive"          # or "drift"
//! default_years = 1
//! interval_width = 0.8
//! changepoints = 25
//!
//! [[catalog.tickers]]
//! symbol = "AAPL"
//! name = "Apple Inc."
//!
//! [ui]
//! log_file = "/tmp/stockcast.log"
//! tail_rows = 5
//! export_dir = "stockcast-exports"
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use stockcast_core::data::yahoo::{DEFAULT_BASE_URL, DEFAULT_USER_AGENT};
use stockcast_core::data::{DataProvider, SyntheticProvider, TickerCatalog, YahooConfig, YahooProvider};
use stockcast_core::forecast::{interval_z, AdditiveSettings, Horizon, ModelKind};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Which market-data provider to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Yahoo,
    Synthetic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataConfig {
    pub provider: ProviderKind,
    pub timeout_secs: u64,
    pub user_agent: String,
    pub base_url: String,
    /// Initial start date shown in the input panel.
    pub default_start: NaiveDate,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Yahoo,
            timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            default_start: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or(NaiveDate::MIN),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ForecastConfig {
    pub model: ModelKind,
    pub default_years: u32,
    pub interval_width: f64,
    pub changepoints: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        let settings = AdditiveSettings::default();
        Self {
            model: ModelKind::default(),
            default_years: 1,
            interval_width: settings.interval_width,
            changepoints: settings.changepoints,
        }
    }
}

impl ForecastConfig {
    pub fn settings(&self) -> AdditiveSettings {
        AdditiveSettings {
            changepoints: self.changepoints,
            interval_width: self.interval_width,
            ..AdditiveSettings::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UiConfig {
    pub log_file: Option<PathBuf>,
    pub tail_rows: usize,
    /// Where `x` in the TUI writes run artifacts.
    pub export_dir: PathBuf,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            log_file: None,
            tail_rows: 5,
            export_dir: PathBuf::from("stockcast-exports"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StockcastConfig {
    pub data: DataConfig,
    pub forecast: ForecastConfig,
    /// Replaces the built-in ticker catalog when present.
    pub catalog: Option<TickerCatalog>,
    pub ui: UiConfig,
}

impl StockcastConfig {
    /// `{config_dir}/stockcast/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("stockcast").join("config.toml"))
    }

    /// The file `load` reads: the explicit path, else the default path if it exists.
    pub fn source_path(path: Option<&Path>) -> Option<PathBuf> {
        match path {
            Some(p) => Some(p.to_path_buf()),
            None => Self::default_path().filter(|p| p.exists()),
        }
    }

    /// Load from an explicit path (must exist) or the default path (may be absent).
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match Self::source_path(path) {
            Some(p) => Self::from_file(&p),
            None => {
                tracing::debug!("no config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        tracing::info!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        Horizon::from_years(self.forecast.default_years)
            .map_err(|e| ConfigError::Invalid(format!("forecast.default_years: {e}")))?;
        interval_z(self.forecast.interval_width)
            .map_err(|e| ConfigError::Invalid(format!("forecast.interval_width: {e}")))?;
        if self.data.timeout_secs == 0 {
            return Err(ConfigError::Invalid("data.timeout_secs must be positive".into()));
        }
        if self.ui.tail_rows == 0 {
            return Err(ConfigError::Invalid("ui.tail_rows must be positive".into()));
        }
        if self.catalog.as_ref().is_some_and(TickerCatalog::is_empty) {
            return Err(ConfigError::Invalid("catalog must list at least one ticker".into()));
        }
        Ok(())
    }

    pub fn default_horizon(&self) -> Horizon {
        Horizon::from_years(self.forecast.default_years).unwrap_or_default()
    }

    pub fn catalog(&self) -> TickerCatalog {
        self.catalog.clone().unwrap_or_default()
    }

    /// TUI log file: `ui.log_file`, else `{data_local_dir}/stockcast/stockcast.log`.
    pub fn log_file(&self) -> Option<PathBuf> {
        self.ui.log_file.clone().or_else(|| {
            dirs::data_local_dir().map(|d| d.join("stockcast").join("stockcast.log"))
        })
    }

    /// Build the configured provider. `force_synthetic` overrides `data.provider`.
    pub fn build_provider(&self, force_synthetic: bool) -> Result<Arc<dyn DataProvider>, ConfigError> {
        let kind = if force_synthetic {
            ProviderKind::Synthetic
        } else {
            self.data.provider
        };
        match kind {
            ProviderKind::Synthetic => Ok(Arc::new(SyntheticProvider::new())),
            ProviderKind::Yahoo => {
                let provider = YahooProvider::new(YahooConfig {
                    base_url: self.data.base_url.clone(),
                    timeout: Duration::from_secs(self.data.timeout_secs),
                    user_agent: self.data.user_agent.clone(),
                })
                .map_err(|e| ConfigError::Invalid(e.to_string()))?;
                Ok(Arc::new(provider))
            }
        }
    }
}
