//! TrainingPoint: the two-column (date, value) series a forecaster consumes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One observation of the series fed to a forecaster.
///
/// `value` is always finite; the preparer drops anything else.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingPoint {
    pub date: NaiveDate,
    pub value: f64,
}

impl TrainingPoint {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Returns true if dates are strictly increasing.
pub fn is_strictly_increasing(points: &[TrainingPoint]) -> bool {
    points.windows(2).all(|w| w[0].date < w[1].date)
}
