//! Property tests for the session price cache.
//!
//! For any sequence of loads:
//! 1. Successful keys are fetched exactly once and kept
//! 2. Failed loads are fetched every time and never kept
//! 3. A cached table is canonical and stays inside its range

use std::collections::HashSet;

use chrono::NaiveDate;
use proptest::prelude::*;
use stockcast_core::data::SyntheticProvider;
use stockcast_core::resolve::DateRange;
use stockcast_runner::{LoadError, SessionCache};

const TICKERS: [&str; 4] = ["AAPL", "MSFT", "RELIANCE.NS", "GONE"];

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 2).unwrap()
}

/// (ticker index, start offset in weeks, length in days). Ranges span at least
/// two full weeks so every one holds weekdays.
fn arb_requests() -> impl Strategy<Value = Vec<(usize, i64, i64)>> {
    prop::collection::vec((0..TICKERS.len(), 0i64..4, 14i64..40), 1..30)
}

fn range(weeks: i64, days: i64) -> DateRange {
    let start = base_date() + chrono::Duration::weeks(weeks);
    DateRange::new(start, start + chrono::Duration::days(days)).unwrap()
}

proptest! {
    #[test]
    fn one_fetch_per_successful_key(requests in arb_requests()) {
        let provider = SyntheticProvider::new().with_unknown(["GONE"]);
        let mut cache = SessionCache::new();
        let mut loaded = HashSet::new();
        let mut failed_attempts = 0usize;

        for (t, weeks, days) in requests {
            let ticker = TICKERS[t];
            let r = range(weeks, days);
            match cache.load(&provider, ticker, r) {
                Ok(prices) => {
                    prop_assert_eq!(&prices.ticker, ticker);
                    prop_assert_eq!(prices.range, r);
                    loaded.insert((ticker, r));
                }
                Err(e) => {
                    prop_assert_eq!(ticker, "GONE");
                    let is_no_data = matches!(e, LoadError::NoData { .. });
                    prop_assert!(is_no_data);
                    failed_attempts += 1;
                }
            }
        }

        prop_assert_eq!(cache.len(), loaded.len());
        prop_assert_eq!(cache.fetch_count(), loaded.len() + failed_attempts);
        prop_assert!(cache.get("GONE", range(0, 14)).is_none());
    }

    #[test]
    fn cached_tables_are_canonical_and_in_range(t in 0usize..3, weeks in 0i64..4, days in 14i64..40) {
        let provider = SyntheticProvider::new();
        let mut cache = SessionCache::new();
        let r = range(weeks, days);
        let first = cache.load(&provider, TICKERS[t], r).unwrap();
        let again = cache.load(&provider, TICKERS[t], r).unwrap();

        prop_assert_eq!(&first.dataset_hash, &again.dataset_hash);
        prop_assert!(first.records.windows(2).all(|w| w[0].date < w[1].date));
        prop_assert!(first.records.iter().all(|rec| rec.date >= r.start && rec.date <= r.end));
    }
}
