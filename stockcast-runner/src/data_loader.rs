//! Price loading for the pipeline.
//!
//! One provider fetch per (ticker, start, end). Successful loads are kept in a
//! session cache for the lifetime of the process; failures are never cached,
//! so a retry after a transient error goes back to the provider.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use thiserror::Error;

use stockcast_core::data::{DataProvider, DataSource};
use stockcast_core::domain::price::{canonicalize, dataset_hash};
use stockcast_core::domain::{PriceRecord, PRICE_COLUMNS};
use stockcast_core::resolve::DateRange;

/// Errors from the data loading layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("no data for '{ticker}' between {start} and {end}")]
    NoData {
        ticker: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("failed to fetch '{ticker}': {message}")]
    FetchFailed { ticker: String, message: String },
}

/// Session cache key.
pub type LoadKey = (String, NaiveDate, NaiveDate);

/// Canonical price table for one (ticker, range), with provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedPrices {
    pub ticker: String,
    pub range: DateRange,
    /// Sorted by date, one record per date.
    pub records: Vec<PriceRecord>,
    pub source: DataSource,
    /// BLAKE3 over the canonical records.
    pub dataset_hash: String,
}

impl LoadedPrices {
    pub fn key(&self) -> LoadKey {
        (self.ticker.clone(), self.range.start, self.range.end)
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        (self.records.len(), PRICE_COLUMNS.len())
    }

    pub fn tail(&self, n: usize) -> &[PriceRecord] {
        let start = self.records.len().saturating_sub(n);
        &self.records[start..]
    }
}

/// Fetch and canonicalize prices once, without caching.
pub fn load_prices(
    provider: &dyn DataProvider,
    ticker: &str,
    range: DateRange,
) -> Result<LoadedPrices, LoadError> {
    let fetched = match provider.fetch(ticker, range.start, range.end) {
        Ok(f) => f,
        Err(e) if e.is_not_found() => {
            return Err(LoadError::NoData {
                ticker: ticker.to_string(),
                start: range.start,
                end: range.end,
            })
        }
        Err(e) => {
            tracing::warn!(%ticker, error = %e, "price fetch failed");
            return Err(LoadError::FetchFailed {
                ticker: ticker.to_string(),
                message: e.to_string(),
            });
        }
    };

    let raw_rows = fetched.records.len();
    let records = canonicalize(fetched.records);
    if records.is_empty() {
        return Err(LoadError::NoData {
            ticker: ticker.to_string(),
            start: range.start,
            end: range.end,
        });
    }
    if records.len() < raw_rows {
        tracing::debug!(%ticker, collapsed = raw_rows - records.len(), "collapsed duplicate dates");
    }

    let dataset_hash = dataset_hash(&records);
    tracing::info!(
        %ticker,
        rows = records.len(),
        source = fetched.source.label(),
        "prices loaded"
    );

    Ok(LoadedPrices {
        ticker: ticker.to_string(),
        range,
        records,
        source: fetched.source,
        dataset_hash,
    })
}

/// Process-lifetime cache of successful loads. No eviction.
#[derive(Debug, Default)]
pub struct SessionCache {
    entries: HashMap<LoadKey, Arc<LoadedPrices>>,
    fetches: usize,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, ticker: &str, range: DateRange) -> Option<Arc<LoadedPrices>> {
        self.entries
            .get(&(ticker.to_string(), range.start, range.end))
            .cloned()
    }

    /// Cached entry for the key, or one provider fetch.
    pub fn load(
        &mut self,
        provider: &dyn DataProvider,
        ticker: &str,
        range: DateRange,
    ) -> Result<Arc<LoadedPrices>, LoadError> {
        if let Some(hit) = self.get(ticker, range) {
            tracing::debug!(%ticker, start = %range.start, end = %range.end, "price cache hit");
            return Ok(hit);
        }

        self.fetches += 1;
        let loaded = Arc::new(load_prices(provider, ticker, range)?);
        self.entries.insert(loaded.key(), Arc::clone(&loaded));
        Ok(loaded)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Provider fetches issued through this cache, successful or not.
    pub fn fetch_count(&self) -> usize {
        self.fetches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockcast_core::data::SyntheticProvider;

    fn range(m1: u32, m2: u32) -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2024, m1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, m2, 28).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn second_load_is_served_from_cache() {
        let provider = SyntheticProvider::new();
        let mut cache = SessionCache::new();
        let a = cache.load(&provider, "AAPL", range(1, 3)).unwrap();
        let b = cache.load(&provider, "AAPL", range(1, 3)).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.fetch_count(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn different_range_is_a_different_key() {
        let provider = SyntheticProvider::new();
        let mut cache = SessionCache::new();
        cache.load(&provider, "AAPL", range(1, 3)).unwrap();
        cache.load(&provider, "AAPL", range(1, 4)).unwrap();
        assert_eq!(cache.fetch_count(), 2);
    }

    #[test]
    fn not_found_is_no_data_and_not_cached() {
        let provider = SyntheticProvider::new().with_unknown(["ZZZZ"]);
        let mut cache = SessionCache::new();
        let err = cache.load(&provider, "ZZZZ", range(1, 2)).unwrap_err();
        assert!(matches!(err, LoadError::NoData { .. }));
        assert!(cache.is_empty());
        cache.load(&provider, "ZZZZ", range(1, 2)).unwrap_err();
        assert_eq!(cache.fetch_count(), 2);
    }

    #[test]
    fn shape_counts_seven_columns() {
        let provider = SyntheticProvider::new();
        let loaded = load_prices(&provider, "MSFT", range(1, 1)).unwrap();
        assert_eq!(loaded.shape().1, 7);
        assert_eq!(loaded.shape().0, loaded.records.len());
        assert_eq!(loaded.tail(5).len(), 5);
        assert_eq!(loaded.source, DataSource::Synthetic);
    }
}
