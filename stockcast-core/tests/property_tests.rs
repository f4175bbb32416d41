//! Property tests for pipeline invariants.
//!
//! Uses proptest to verify:
//! 1. Preparer output: dates strictly increasing, a subset of record dates, all finite
//! 2. Forecast shape: history + horizon points, consecutive future days
//! 3. Forecast bounds: lower <= predicted <= upper everywhere, including
//!    weekday-only histories long enough to switch on yearly seasonality
//! 4. Sentiment rule: Positive iff predicted > current

use chrono::{Datelike, NaiveDate, Weekday};
use proptest::prelude::*;
use std::collections::BTreeSet;
use stockcast_core::domain::{series::is_strictly_increasing, Direction, PriceRecord, Sentiment, TrainingPoint};
use stockcast_core::forecast::{AdditiveForecaster, DriftForecaster, Forecaster};
use stockcast_core::prepare::prepare_series;

// ── Strategies (proptest) ────────────────────────────────────────────

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 1, 1).unwrap()
}

/// Records with arbitrary (possibly repeated, unordered) day offsets and
/// occasionally non-finite closes.
fn arb_records() -> impl Strategy<Value = Vec<PriceRecord>> {
    prop::collection::vec(
        (
            0i64..120,
            prop_oneof![
                8 => (1.0..500.0_f64),
                1 => Just(f64::NAN),
                1 => Just(f64::INFINITY),
            ],
        ),
        0..80,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .map(|(offset, close)| PriceRecord {
                date: base_date() + chrono::Duration::days(offset),
                open: 1.0,
                high: 1.0,
                low: 1.0,
                close,
                adjusted_close: close,
                volume: 10,
            })
            .collect()
    })
}

/// Strictly increasing training series with 1..=4 day gaps.
fn arb_history() -> impl Strategy<Value = Vec<TrainingPoint>> {
    prop::collection::vec((1i64..=4, 10.0..200.0_f64), 2..60).prop_map(|steps| {
        let mut date = base_date();
        steps
            .into_iter()
            .map(|(gap, value)| {
                date += chrono::Duration::days(gap);
                TrainingPoint::new(date, value)
            })
            .collect()
    })
}

/// Weekday-only closes spanning more than two years, with a sprinkling of
/// market holidays. The first and last weekday are always kept.
fn arb_long_history() -> impl Strategy<Value = Vec<TrainingPoint>> {
    const MAX_SPAN: usize = 900;
    (
        733i64..MAX_SPAN as i64,
        prop::collection::vec(prop::bool::weighted(0.03), MAX_SPAN + 1),
        prop::collection::vec(10.0..200.0_f64, MAX_SPAN + 1),
    )
        .prop_map(|(span, holidays, values)| {
            let weekdays: Vec<i64> = (0..=span)
                .filter(|&d| {
                    let date = base_date() + chrono::Duration::days(d);
                    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
                })
                .collect();
            let last = weekdays.len() - 1;
            weekdays
                .into_iter()
                .enumerate()
                .filter(|&(i, d)| i == 0 || i == last || !holidays[d as usize])
                .map(|(_, d)| TrainingPoint::new(base_date() + chrono::Duration::days(d), values[d as usize]))
                .collect()
        })
}

// ── 1. Preparer output ───────────────────────────────────────────────

proptest! {
    #[test]
    fn prepared_dates_increase_and_come_from_records(records in arb_records()) {
        let prepared = prepare_series(&records);
        let record_dates: BTreeSet<NaiveDate> = records.iter().map(|r| r.date).collect();

        prop_assert!(is_strictly_increasing(&prepared.points));
        prop_assert!(prepared.points.iter().all(|p| record_dates.contains(&p.date)));
        prop_assert!(prepared.points.iter().all(|p| p.value.is_finite()));
        prop_assert_eq!(prepared.points.len() + prepared.dropped(), records.len());
    }
}

// ── 2 + 3. Forecast shape and bounds ─────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn additive_forecast_shape_and_bounds(history in arb_history(), horizon in 0u32..400) {
        let fc = AdditiveForecaster::default().forecast(&history, horizon).unwrap();
        check_forecast(&history, horizon, &fc)?;
    }

    #[test]
    fn drift_forecast_shape_and_bounds(history in arb_history(), horizon in 0u32..400) {
        let fc = DriftForecaster::default().forecast(&history, horizon).unwrap();
        check_forecast(&history, horizon, &fc)?;
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn additive_forecast_on_multi_year_weekdays(history in arb_long_history(), horizon in 0u32..120) {
        let span = (history[history.len() - 1].date - history[0].date).num_days();
        prop_assert!(span >= 730);

        let fc = AdditiveForecaster::default().forecast(&history, horizon).unwrap();
        check_forecast(&history, horizon, &fc)?;
        prop_assert!(fc.components.iter().any(|c| c.yearly != 0.0));
        prop_assert!(fc.components.iter().any(|c| c.weekly != 0.0));
    }
}

fn check_forecast(
    history: &[TrainingPoint],
    horizon: u32,
    fc: &stockcast_core::domain::Forecast,
) -> Result<(), TestCaseError> {
    prop_assert_eq!(fc.points.len(), history.len() + horizon as usize);
    prop_assert_eq!(fc.components.len(), fc.points.len());
    prop_assert!(fc.points.windows(2).all(|w| w[0].date < w[1].date));

    for (p, h) in fc.fitted().iter().zip(history) {
        prop_assert_eq!(p.date, h.date);
    }
    let last = history[history.len() - 1].date;
    for (k, p) in fc.future().iter().enumerate() {
        prop_assert_eq!(p.date, last + chrono::Duration::days(k as i64 + 1));
    }
    for p in &fc.points {
        prop_assert!(p.predicted_value.is_finite());
        prop_assert!(p.lower_bound <= p.predicted_value);
        prop_assert!(p.predicted_value <= p.upper_bound);
    }
    Ok(())
}

// ── 4. Sentiment rule ────────────────────────────────────────────────

proptest! {
    #[test]
    fn sentiment_positive_iff_strictly_higher(current in -1e6..1e6_f64, predicted in -1e6..1e6_f64) {
        let s = Sentiment::from_values(current, predicted);
        prop_assert_eq!(s.direction == Direction::Positive, predicted > current);
    }

    #[test]
    fn equal_values_are_negative(value in -1e6..1e6_f64) {
        prop_assert_eq!(Sentiment::from_values(value, value).direction, Direction::Negative);
    }
}
