//! PriceRecord: one daily OHLCV row as returned by a market-data provider.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Column names of a price table, in display order.
pub const PRICE_COLUMNS: [&str; 7] = ["Date", "Open", "High", "Low", "Close", "Adj Close", "Volume"];

/// Daily OHLCV record for a single ticker.
///
/// Fields the provider left empty are NaN (volume 0). Records are never
/// mutated after the loader hands them out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adjusted_close: f64,
    pub volume: u64,
}

/// Sort records by date and collapse duplicate dates (the last occurrence wins).
pub fn canonicalize(mut records: Vec<PriceRecord>) -> Vec<PriceRecord> {
    // Stable sort keeps provider order among equal dates, so "last" is well defined.
    records.sort_by_key(|r| r.date);
    let mut out: Vec<PriceRecord> = Vec::with_capacity(records.len());
    for record in records {
        match out.last_mut() {
            Some(prev) if prev.date == record.date => *prev = record,
            _ => out.push(record),
        }
    }
    out
}

/// BLAKE3 hash over the canonical byte representation of a record slice.
///
/// Floats are hashed by bit pattern so NaN gaps contribute deterministically.
pub fn dataset_hash(records: &[PriceRecord]) -> String {
    let mut hasher = blake3::Hasher::new();
    for r in records {
        hasher.update(r.date.to_string().as_bytes());
        for v in [r.open, r.high, r.low, r.close, r.adjusted_close] {
            hasher.update(&v.to_bits().to_le_bytes());
        }
        hasher.update(&r.volume.to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}
