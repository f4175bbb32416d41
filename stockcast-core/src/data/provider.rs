//! Data provider trait and structured error types.
//!
//! The DataProvider trait abstracts over data sources (Yahoo Finance, the
//! synthetic generator) so the loader can swap implementations and tests can
//! substitute stubs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::PriceRecord;

/// Structured error types for data operations.
///
/// These are designed to be displayable in both CLI and TUI contexts.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("HTTP {status} for {symbol}")]
    HttpStatus { symbol: String, status: u16 },

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("HTTP client setup failed: {0}")]
    Client(String),
}

impl DataError {
    /// True when the provider answered but has nothing for the symbol.
    ///
    /// The resolver and loader treat this as an empty result rather than a
    /// transport failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DataError::SymbolNotFound { .. })
    }
}

/// Result of a successful fetch for a single symbol.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub symbol: String,
    pub records: Vec<PriceRecord>,
    pub source: DataSource,
}

/// Where the data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
    YahooFinance,
    Synthetic,
}

impl DataSource {
    pub fn label(self) -> &'static str {
        match self {
            DataSource::YahooFinance => "Yahoo Finance",
            DataSource::Synthetic => "synthetic",
        }
    }
}

/// Trait for market-data providers.
///
/// One call is one fetch: implementations never retry. An empty `records`
/// vector is a valid answer meaning "nothing in that range".
pub trait DataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily OHLCV records for a symbol over an inclusive date range.
    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate)
        -> Result<FetchResult, DataError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_classification() {
        assert!(DataError::SymbolNotFound { symbol: "X".into() }.is_not_found());
        assert!(!DataError::NetworkUnreachable("down".into()).is_not_found());
    }

    #[test]
    fn errors_render_for_display() {
        let e = DataError::HttpStatus {
            symbol: "AAPL".into(),
            status: 502,
        };
        assert_eq!(e.to_string(), "HTTP 502 for AAPL");
    }
}
