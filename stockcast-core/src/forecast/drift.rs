//! Random walk with drift.
//!
//! The slope is the average daily change between the first and last
//! observation. History is fitted one step ahead from the previous value;
//! the future is a straight line from the last value with bounds growing
//! with the square root of days ahead.

use super::{future_dates, interval_z, require_history, ForecastError, Forecaster};
use crate::domain::{ComponentPoint, Forecast, ForecastPoint, TrainingPoint};

#[derive(Debug, Clone)]
pub struct DriftForecaster {
    interval_width: f64,
}

impl DriftForecaster {
    pub fn new(interval_width: f64) -> Self {
        Self { interval_width }
    }
}

impl Default for DriftForecaster {
    fn default() -> Self {
        Self::new(0.8)
    }
}

impl Forecaster for DriftForecaster {
    fn name(&self) -> &str {
        "drift"
    }

    fn forecast(
        &self,
        history: &[TrainingPoint],
        horizon_days: u32,
    ) -> Result<Forecast, ForecastError> {
        require_history(history, 2)?;
        let z = interval_z(self.interval_width)?;

        let first = history[0];
        let last = history[history.len() - 1];
        let span = (last.date - first.date).num_days().max(1) as f64;
        let slope = (last.value - first.value) / span;

        // residual variance per calendar day
        let mut ss = 0.0;
        let mut total_gap = 0.0;
        for w in history.windows(2) {
            let gap = (w[1].date - w[0].date).num_days().max(1) as f64;
            let r = (w[1].value - w[0].value) - slope * gap;
            ss += r * r;
            total_gap += gap;
        }
        let sigma = (ss / total_gap).sqrt();

        let mut points = Vec::with_capacity(history.len() + horizon_days as usize);
        points.push(ForecastPoint {
            date: first.date,
            predicted_value: first.value,
            lower_bound: first.value,
            upper_bound: first.value,
        });
        for w in history.windows(2) {
            let gap = (w[1].date - w[0].date).num_days().max(1) as f64;
            let predicted = w[0].value + slope * gap;
            let half = z * sigma * gap.sqrt();
            points.push(ForecastPoint {
                date: w[1].date,
                predicted_value: predicted,
                lower_bound: predicted - half,
                upper_bound: predicted + half,
            });
        }
        for (k, date) in future_dates(last.date, horizon_days).into_iter().enumerate() {
            let ahead = (k + 1) as f64;
            let predicted = last.value + slope * ahead;
            let half = z * sigma * ahead.sqrt();
            points.push(ForecastPoint {
                date,
                predicted_value: predicted,
                lower_bound: predicted - half,
                upper_bound: predicted + half,
            });
        }

        let components = points
            .iter()
            .map(|p| ComponentPoint {
                date: p.date,
                trend: p.predicted_value,
                weekly: 0.0,
                yearly: 0.0,
            })
            .collect();

        tracing::debug!(slope, sigma, "drift model fitted");

        Ok(Forecast {
            model: self.name().to_string(),
            points,
            components,
            history_len: history.len(),
            horizon_days,
        })
    }
}
