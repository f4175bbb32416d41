//! Additive trend + seasonality model.
//!
//! `y(t) = trend(t) + weekly(t) + yearly(t)` where the trend is piecewise
//! linear with evenly spaced potential changepoints and the seasonal terms are
//! Fourier series. All coefficients come from one ridge-regularized least
//! squares fit on max-scaled values. Intervals use the residual spread,
//! widened with distance past the last observation.

use chrono::{Datelike, NaiveDate};
use ndarray::{s, Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use super::linalg::ridge_solve;
use super::{future_dates, interval_z, require_history, ForecastError, Forecaster};
use crate::domain::{ComponentPoint, Forecast, ForecastPoint, TrainingPoint};

const WEEK_DAYS: f64 = 7.0;
const YEAR_DAYS: f64 = 365.25;
const MIN_WEEKLY_SPAN_DAYS: i64 = 14;
const MIN_YEARLY_SPAN_DAYS: i64 = 730;
/// Keeps the unpenalized intercept/slope block positive definite.
const JITTER: f64 = 1e-9;

/// Tuning knobs for [`AdditiveForecaster`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdditiveSettings {
    /// Maximum number of potential trend changepoints.
    pub changepoints: usize,
    /// Fraction of history (from the start) where changepoints may sit.
    pub changepoint_range: f64,
    /// Ridge penalty per observation on changepoint slope deltas.
    pub changepoint_penalty: f64,
    /// Ridge penalty per observation on seasonal coefficients.
    pub seasonality_penalty: f64,
    pub weekly_order: usize,
    pub yearly_order: usize,
    /// Central probability mass covered by `[lower_bound, upper_bound]`.
    pub interval_width: f64,
}

impl Default for AdditiveSettings {
    fn default() -> Self {
        Self {
            changepoints: 25,
            changepoint_range: 0.8,
            changepoint_penalty: 0.05,
            seasonality_penalty: 0.001,
            weekly_order: 3,
            yearly_order: 10,
            interval_width: 0.8,
        }
    }
}

/// Feature layout for one fit.
#[derive(Debug, Clone)]
struct Design {
    origin: NaiveDate,
    span_days: f64,
    changepoints: Vec<f64>,
    weekly_order: usize,
    yearly_order: usize,
}

impl Design {
    fn new(history: &[TrainingPoint], settings: &AdditiveSettings) -> Self {
        let origin = history[0].date;
        let last = history[history.len() - 1].date;
        let span = (last - origin).num_days();

        let mut design = Self {
            origin,
            span_days: span.max(1) as f64,
            changepoints: Vec::new(),
            weekly_order: if span >= MIN_WEEKLY_SPAN_DAYS { settings.weekly_order } else { 0 },
            yearly_order: if span >= MIN_YEARLY_SPAN_DAYS { settings.yearly_order } else { 0 },
        };

        let range = settings.changepoint_range.clamp(0.0, 1.0);
        let hist_size = (history.len() as f64 * range).floor() as usize;
        let n_cp = settings.changepoints.min(hist_size.saturating_sub(1));
        if n_cp > 0 {
            let step = (hist_size - 1) as f64 / n_cp as f64;
            design.changepoints = (1..=n_cp)
                .map(|i| {
                    let idx = (i as f64 * step).round() as usize;
                    design.scaled_time(history[idx.min(history.len() - 1)].date)
                })
                .collect();
        }
        design
    }

    fn trend_width(&self) -> usize {
        2 + self.changepoints.len()
    }

    fn weekly_range(&self) -> std::ops::Range<usize> {
        let start = self.trend_width();
        start..start + 2 * self.weekly_order
    }

    fn yearly_range(&self) -> std::ops::Range<usize> {
        let start = self.weekly_range().end;
        start..start + 2 * self.yearly_order
    }

    fn width(&self) -> usize {
        self.yearly_range().end
    }

    fn scaled_time(&self, date: NaiveDate) -> f64 {
        (date - self.origin).num_days() as f64 / self.span_days
    }

    fn row(&self, date: NaiveDate, out: &mut Vec<f64>) {
        out.clear();
        let t = self.scaled_time(date);
        out.push(1.0);
        out.push(t);
        out.extend(self.changepoints.iter().map(|&s| (t - s).max(0.0)));

        let day = date.num_days_from_ce() as f64;
        fourier(day, WEEK_DAYS, self.weekly_order, out);
        fourier(day, YEAR_DAYS, self.yearly_order, out);
    }

    /// One row per date, `width()` columns.
    fn matrix(&self, dates: &[NaiveDate]) -> Array2<f64> {
        let mut x = Array2::<f64>::zeros((dates.len(), self.width()));
        let mut row = Vec::with_capacity(self.width());
        for (i, &date) in dates.iter().enumerate() {
            self.row(date, &mut row);
            x.row_mut(i).assign(&ArrayView1::from(&row[..]));
        }
        x
    }

    fn penalties(&self, n: usize, settings: &AdditiveSettings) -> Array1<f64> {
        let n = n as f64;
        let mut penalty = vec![JITTER, JITTER];
        penalty.extend(std::iter::repeat(settings.changepoint_penalty * n + JITTER).take(self.changepoints.len()));
        let seasonal = 2 * (self.weekly_order + self.yearly_order);
        penalty.extend(std::iter::repeat(settings.seasonality_penalty * n + JITTER).take(seasonal));
        Array1::from(penalty)
    }
}

fn fourier(day: f64, period: f64, order: usize, out: &mut Vec<f64>) {
    for k in 1..=order {
        let angle = 2.0 * std::f64::consts::PI * k as f64 * day / period;
        out.push(angle.sin());
        out.push(angle.cos());
    }
}

/// Additive trend/seasonality forecaster.
#[derive(Debug, Clone, Default)]
pub struct AdditiveForecaster {
    settings: AdditiveSettings,
}

impl AdditiveForecaster {
    pub fn new(settings: AdditiveSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &AdditiveSettings {
        &self.settings
    }
}

impl Forecaster for AdditiveForecaster {
    fn name(&self) -> &str {
        "additive"
    }

    fn forecast(
        &self,
        history: &[TrainingPoint],
        horizon_days: u32,
    ) -> Result<Forecast, ForecastError> {
        require_history(history, 2)?;
        let z = interval_z(self.settings.interval_width)?;

        let design = Design::new(history, &self.settings);
        let p = design.width();

        let y_scale = history
            .iter()
            .map(|pt| pt.value.abs())
            .fold(0.0_f64, f64::max);
        let y_scale = if y_scale > 0.0 { y_scale } else { 1.0 };

        let history_dates: Vec<NaiveDate> = history.iter().map(|pt| pt.date).collect();
        let x = design.matrix(&history_dates);
        let y: Array1<f64> = history.iter().map(|pt| pt.value / y_scale).collect();
        let beta = ridge_solve(&x, &y, &design.penalties(history.len(), &self.settings))
            .ok_or_else(|| ForecastError::Degenerate("normal equations are singular".into()))?;

        let residuals = &y - &x.dot(&beta);
        let ss = residuals.dot(&residuals);
        let dof = history.len().saturating_sub(p).max(1) as f64;
        let sigma = (ss / dof).sqrt();

        let last = history[history.len() - 1].date;
        let dates: Vec<NaiveDate> = history_dates
            .into_iter()
            .chain(future_dates(last, horizon_days))
            .collect();

        let full = design.matrix(&dates);
        let part = |cols: std::ops::Range<usize>| -> Array1<f64> {
            if cols.is_empty() {
                return Array1::zeros(full.nrows());
            }
            full.slice(s![.., cols.clone()]).dot(&beta.slice(s![cols])) * y_scale
        };
        let trend = part(0..design.trend_width());
        let weekly = part(design.weekly_range());
        let yearly = part(design.yearly_range());

        let mut points = Vec::with_capacity(dates.len());
        let mut components = Vec::with_capacity(dates.len());
        for (i, &date) in dates.iter().enumerate() {
            let predicted = trend[i] + weekly[i] + yearly[i];

            let ahead = (date - last).num_days().max(0) as f64;
            let half_width = z * sigma * (1.0 + ahead / design.span_days).sqrt() * y_scale;

            points.push(ForecastPoint {
                date,
                predicted_value: predicted,
                lower_bound: predicted - half_width,
                upper_bound: predicted + half_width,
            });
            components.push(ComponentPoint {
                date,
                trend: trend[i],
                weekly: weekly[i],
                yearly: yearly[i],
            });
        }

        tracing::debug!(
            params = p,
            changepoints = design.changepoints.len(),
            weekly = design.weekly_order > 0,
            yearly = design.yearly_order > 0,
            sigma,
            "additive model fitted"
        );

        Ok(Forecast {
            model: self.name().to_string(),
            points,
            components,
            history_len: history.len(),
            horizon_days,
        })
    }
}
