//! Series preparation: PriceRecord table → (date, value) training series.

use crate::domain::{PriceRecord, TrainingPoint};

/// Prepared training series plus what was discarded on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedSeries {
    pub points: Vec<TrainingPoint>,
    /// Rows whose close was not a finite number.
    pub dropped_invalid: usize,
    /// Rows whose date did not advance past the previous kept row.
    pub dropped_out_of_order: usize,
}

impl PreparedSeries {
    pub fn dropped(&self) -> usize {
        self.dropped_invalid + self.dropped_out_of_order
    }

    pub fn tail(&self, n: usize) -> &[TrainingPoint] {
        let start = self.points.len().saturating_sub(n);
        &self.points[start..]
    }
}

/// Project close prices into a training series.
///
/// Non-finite closes are dropped, as is any row whose date is not strictly
/// after the last kept date, so the output dates are strictly increasing.
pub fn prepare_series(records: &[PriceRecord]) -> PreparedSeries {
    let mut points: Vec<TrainingPoint> = Vec::with_capacity(records.len());
    let mut dropped_invalid = 0;
    let mut dropped_out_of_order = 0;

    for record in records {
        if !record.close.is_finite() {
            dropped_invalid += 1;
            continue;
        }
        if points.last().is_some_and(|p| record.date <= p.date) {
            dropped_out_of_order += 1;
            continue;
        }
        points.push(TrainingPoint::new(record.date, record.close));
    }

    if dropped_invalid + dropped_out_of_order > 0 {
        tracing::warn!(
            dropped_invalid,
            dropped_out_of_order,
            kept = points.len(),
            "dropped rows while preparing training series"
        );
    }

    PreparedSeries {
        points,
        dropped_invalid,
        dropped_out_of_order,
    }
}
