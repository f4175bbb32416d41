//! Sentiment: the forecast's end value compared against the last observation.

use serde::{Deserialize, Serialize};

use super::forecast::Forecast;
use super::series::TrainingPoint;

/// Direction of the predicted move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Positive,
    Negative,
}

impl Direction {
    pub fn label(self) -> &'static str {
        match self {
            Direction::Positive => "Positive",
            Direction::Negative => "Negative",
        }
    }
}

/// Sentiment derived from one pipeline run. Recomputed every run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    pub direction: Direction,
    /// Last observed training value.
    pub current: f64,
    /// Predicted value at the end of the horizon.
    pub predicted: f64,
}

impl Sentiment {
    /// Positive iff `predicted > current`. A tie is Negative.
    pub fn from_values(current: f64, predicted: f64) -> Self {
        let direction = if predicted > current {
            Direction::Positive
        } else {
            Direction::Negative
        };
        Self {
            direction,
            current,
            predicted,
        }
    }

    /// Compare the last training value with the last forecast point.
    ///
    /// Returns `None` when either sequence is empty.
    pub fn evaluate(training: &[TrainingPoint], forecast: &Forecast) -> Option<Self> {
        let current = training.last()?.value;
        let predicted = forecast.last()?.predicted_value;
        Some(Self::from_values(current, predicted))
    }

    /// Relative change from current to predicted, as a fraction.
    pub fn change_pct(&self) -> f64 {
        if self.current == 0.0 {
            return 0.0;
        }
        (self.predicted - self.current) / self.current
    }
}
