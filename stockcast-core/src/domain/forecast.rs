//! Forecast output types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Predicted value with its uncertainty interval for a single date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub predicted_value: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

/// Additive decomposition behind a ForecastPoint.
///
/// `trend + weekly + yearly` equals the point's `predicted_value`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentPoint {
    pub date: NaiveDate,
    pub trend: f64,
    pub weekly: f64,
    pub yearly: f64,
}

impl ComponentPoint {
    pub fn total(&self) -> f64 {
        self.trend + self.weekly + self.yearly
    }
}

/// Full forecaster output: history fit followed by the future horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    /// Name of the model that produced this forecast.
    pub model: String,
    /// One point per history date, then one per future calendar day.
    pub points: Vec<ForecastPoint>,
    /// Component breakdown, aligned index-for-index with `points`.
    pub components: Vec<ComponentPoint>,
    /// Number of leading points that correspond to history dates.
    pub history_len: usize,
    pub horizon_days: u32,
}

impl Forecast {
    /// The final predicted point (end of the horizon).
    pub fn last(&self) -> Option<&ForecastPoint> {
        self.points.last()
    }

    /// Points fitted over the history range.
    pub fn fitted(&self) -> &[ForecastPoint] {
        &self.points[..self.history_len.min(self.points.len())]
    }

    /// Points strictly after the last history date.
    pub fn future(&self) -> &[ForecastPoint] {
        &self.points[self.history_len.min(self.points.len())..]
    }

    /// Last `n` points, for tail tables.
    pub fn tail(&self, n: usize) -> &[ForecastPoint] {
        let start = self.points.len().saturating_sub(n);
        &self.points[start..]
    }
}
