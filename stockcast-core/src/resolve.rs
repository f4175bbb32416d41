//! Input resolution: ticker choice + date range → validated input.
//!
//! Validation is a probe fetch over the last few calendar days. An empty
//! answer means the ticker is invalid and the run stops there.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::DataProvider;

/// Calendar days covered by the validation probe (spans weekends and short holidays).
pub const PROBE_WINDOW_DAYS: i64 = 7;

/// How the user picked the ticker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickerChoice {
    /// Picked from the catalog list.
    Listed(String),
    /// Typed as free text.
    Custom(String),
}

impl TickerChoice {
    pub fn raw(&self) -> &str {
        match self {
            TickerChoice::Listed(s) | TickerChoice::Custom(s) => s,
        }
    }
}

/// Inclusive date range for the historical fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ResolveError> {
        if start > end {
            return Err(ResolveError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Number of calendar days in the range, inclusive.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// A ticker that passed the probe, paired with its range.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedInput {
    pub ticker: String,
    pub range: DateRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("please select or enter a stock code")]
    EmptyTicker,

    #[error("start date {start} is after end date {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("invalid stock code: {ticker} (no data found for this stock code)")]
    InvalidTicker { ticker: String },

    #[error("fetch failed for {ticker}: {message}")]
    FetchFailed { ticker: String, message: String },
}

/// Trim and upper-case a typed ticker. Returns `None` for blank input.
pub fn normalize_ticker(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_uppercase())
    }
}

/// Characters a market symbol may contain (`BRK-B`, `ZOMATO.NS`, `^GSPC`, `EURUSD=X`).
pub fn is_symbol_text(ticker: &str) -> bool {
    !ticker.is_empty()
        && ticker
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '^' | '=' | '-'))
}

/// Normalize the choice and check the range. No fetch happens here.
pub fn check_input(choice: &TickerChoice, range: DateRange) -> Result<ResolvedInput, ResolveError> {
    let ticker = normalize_ticker(choice.raw()).ok_or(ResolveError::EmptyTicker)?;
    let range = DateRange::new(range.start, range.end)?;
    Ok(ResolvedInput { ticker, range })
}

/// Probe the provider for recent data on `ticker`.
///
/// Text that cannot be a symbol is rejected without a fetch.
pub fn probe(provider: &dyn DataProvider, ticker: &str, today: NaiveDate) -> Result<(), ResolveError> {
    if !is_symbol_text(ticker) {
        return Err(ResolveError::InvalidTicker {
            ticker: ticker.to_string(),
        });
    }

    let start = today - chrono::Duration::days(PROBE_WINDOW_DAYS);
    match provider.fetch(ticker, start, today) {
        Ok(result) if result.records.is_empty() => Err(ResolveError::InvalidTicker {
            ticker: ticker.to_string(),
        }),
        Ok(_) => Ok(()),
        Err(e) if e.is_not_found() => Err(ResolveError::InvalidTicker {
            ticker: ticker.to_string(),
        }),
        Err(e) => Err(ResolveError::FetchFailed {
            ticker: ticker.to_string(),
            message: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DataError, DataSource, FetchResult, SyntheticProvider};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    struct Failing;

    impl DataProvider for Failing {
        fn name(&self) -> &str {
            "failing"
        }
        fn fetch(&self, _: &str, _: NaiveDate, _: NaiveDate) -> Result<FetchResult, DataError> {
            Err(DataError::NetworkUnreachable("connection refused".into()))
        }
    }

    struct Empty;

    impl DataProvider for Empty {
        fn name(&self) -> &str {
            "empty"
        }
        fn fetch(&self, s: &str, _: NaiveDate, _: NaiveDate) -> Result<FetchResult, DataError> {
            Ok(FetchResult {
                symbol: s.to_string(),
                records: vec![],
                source: DataSource::Synthetic,
            })
        }
    }

    #[test]
    fn normalizes_custom_input() {
        assert_eq!(normalize_ticker("  aapl "), Some("AAPL".into()));
        assert_eq!(normalize_ticker("   "), None);
    }

    #[test]
    fn empty_choice_is_rejected_before_fetch() {
        let range = DateRange::new(d(2020, 1, 1), d(2024, 1, 1)).unwrap();
        let err = check_input(&TickerChoice::Custom(" ".into()), range).unwrap_err();
        assert_eq!(err, ResolveError::EmptyTicker);
    }

    #[test]
    fn reversed_range_is_rejected() {
        let err = DateRange::new(d(2024, 1, 2), d(2024, 1, 1)).unwrap_err();
        assert!(matches!(err, ResolveError::InvalidRange { .. }));
        assert_eq!(DateRange::new(d(2024, 1, 1), d(2024, 1, 1)).unwrap().days(), 1);
    }

    #[test]
    fn empty_probe_is_invalid_ticker() {
        let err = probe(&Empty, "AAPL", d(2024, 3, 8)).unwrap_err();
        assert_eq!(err, ResolveError::InvalidTicker { ticker: "AAPL".into() });
    }

    #[test]
    fn not_found_probe_is_invalid_ticker() {
        let provider = SyntheticProvider::new().with_unknown(["BOGUS"]);
        let err = probe(&provider, "BOGUS", d(2024, 3, 8)).unwrap_err();
        assert!(matches!(err, ResolveError::InvalidTicker { .. }));
    }

    #[test]
    fn transport_failure_is_fetch_failed() {
        let err = probe(&Failing, "AAPL", d(2024, 3, 8)).unwrap_err();
        match err {
            ResolveError::FetchFailed { message, .. } => assert!(message.contains("refused")),
            other => panic!("expected FetchFailed, got {other:?}"),
        }
    }

    #[test]
    fn check_input_uppercases_and_keeps_range() {
        let range = DateRange::new(d(2020, 1, 1), d(2024, 3, 8)).unwrap();
        let input = check_input(&TickerChoice::Custom(" msft ".into()), range).unwrap();
        assert_eq!(input.ticker, "MSFT");
        assert_eq!(input.range, range);
    }

    #[test]
    fn check_input_rejects_inverted_range() {
        let range = DateRange {
            start: d(2024, 3, 8),
            end: d(2024, 1, 1),
        };
        let err = check_input(&TickerChoice::Listed("AAPL".into()), range).unwrap_err();
        assert!(matches!(err, ResolveError::InvalidRange { .. }));
    }

    #[test]
    fn symbol_text_accepts_exchange_suffixes_and_indices() {
        for ok in ["AAPL", "ZOMATO.NS", "BRK-B", "^GSPC", "EURUSD=X"] {
            assert!(is_symbol_text(ok), "{ok}");
        }
        for bad in ["", "GME#", "A/B", "AAPL?X", "A B", "AAPL&period1=0", "%2F"] {
            assert!(!is_symbol_text(bad), "{bad}");
        }
    }

    #[test]
    fn url_breaking_text_is_invalid_without_fetch() {
        // Failing would turn any fetch into FetchFailed.
        for bad in ["GME#", "A/B", "AAPL?X"] {
            let err = probe(&Failing, bad, d(2024, 3, 8)).unwrap_err();
            assert_eq!(err, ResolveError::InvalidTicker { ticker: bad.into() });
        }
    }
}
