//! Forecasting behind a narrow interface.
//!
//! A forecaster takes an ordered training series and a horizon in days and
//! returns one point per history date followed by one point per calendar day
//! of the horizon. Everything about how it gets there is private to the
//! implementation; callers (and tests) only see the [`Forecaster`] trait.

pub mod additive;
pub mod drift;
pub mod linalg;

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};
use thiserror::Error;

use crate::domain::{Forecast, TrainingPoint};

pub use additive::{AdditiveForecaster, AdditiveSettings};
pub use drift::DriftForecaster;

pub const DAYS_PER_YEAR: u32 = 365;
pub const MIN_YEARS: u32 = 1;
pub const MAX_YEARS: u32 = 10;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ForecastError {
    #[error("need at least {required} training points, got {actual}")]
    InsufficientHistory { required: usize, actual: usize },

    #[error("forecast horizon must be 1-10 years, got {years}")]
    InvalidHorizon { years: u32 },

    #[error("interval width must be in (0, 1), got {0}")]
    InvalidIntervalWidth(f64),

    #[error("unknown forecast model: {0}")]
    UnknownModel(String),

    #[error("model fit failed: {0}")]
    Degenerate(String),
}

/// Forecast horizon expressed in whole years (the slider value).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Horizon {
    years: u32,
}

impl Horizon {
    pub fn from_years(years: u32) -> Result<Self, ForecastError> {
        if !(MIN_YEARS..=MAX_YEARS).contains(&years) {
            return Err(ForecastError::InvalidHorizon { years });
        }
        Ok(Self { years })
    }

    pub fn years(self) -> u32 {
        self.years
    }

    /// `365 × years`
    pub fn days(self) -> u32 {
        self.years * DAYS_PER_YEAR
    }
}

impl Default for Horizon {
    fn default() -> Self {
        Self { years: MIN_YEARS }
    }
}

/// The forecaster seam.
pub trait Forecaster: Send + Sync {
    /// Model name, recorded on every forecast it produces.
    fn name(&self) -> &str;

    /// Fit `history` and predict it plus `horizon_days` calendar days past its end.
    fn forecast(
        &self,
        history: &[TrainingPoint],
        horizon_days: u32,
    ) -> Result<Forecast, ForecastError>;
}

/// Which built-in model to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    #[default]
    Additive,
    Drift,
}

impl ModelKind {
    pub fn build(self, settings: &AdditiveSettings) -> Box<dyn Forecaster> {
        match self {
            ModelKind::Additive => Box::new(AdditiveForecaster::new(settings.clone())),
            ModelKind::Drift => Box::new(DriftForecaster::new(settings.interval_width)),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ModelKind::Additive => "additive",
            ModelKind::Drift => "drift",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "additive" => Ok(ModelKind::Additive),
            "drift" => Ok(ModelKind::Drift),
            other => Err(ForecastError::UnknownModel(other.to_string())),
        }
    }
}

/// `horizon_days` consecutive calendar days after `last`.
pub fn future_dates(last: NaiveDate, horizon_days: u32) -> Vec<NaiveDate> {
    last.iter_days().skip(1).take(horizon_days as usize).collect()
}

/// Two-sided standard-normal quantile for a central interval of `width`.
pub fn interval_z(width: f64) -> Result<f64, ForecastError> {
    if !(width > 0.0 && width < 1.0) {
        return Err(ForecastError::InvalidIntervalWidth(width));
    }
    let normal = Normal::new(0.0, 1.0).map_err(|e| ForecastError::Degenerate(e.to_string()))?;
    Ok(normal.inverse_cdf(0.5 + width / 2.0))
}

pub(crate) fn require_history(history: &[TrainingPoint], required: usize) -> Result<(), ForecastError> {
    if history.len() < required {
        return Err(ForecastError::InsufficientHistory {
            required,
            actual: history.len(),
        });
    }
    Ok(())
}
