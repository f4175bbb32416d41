//! Ticker catalog: the fixed list offered in the ticker selector.
//!
//! A config file may replace it (`[[catalog.tickers]]` with `symbol` and
//! `name`). It doubles as the suggestion source when a custom ticker is typed
//! or rejected.

use serde::{Deserialize, Serialize};

/// A listed ticker with its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerEntry {
    pub symbol: String,
    pub name: String,
}

impl TickerEntry {
    pub fn new(symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
        }
    }

    /// `"AAPL - Apple Inc."`
    pub fn label(&self) -> String {
        format!("{} - {}", self.symbol, self.name)
    }
}

/// The complete ticker catalog, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerCatalog {
    pub tickers: Vec<TickerEntry>,
}

impl TickerCatalog {
    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TickerEntry> {
        self.tickers.get(index)
    }

    /// Look up an entry by symbol (case-insensitive).
    pub fn find(&self, symbol: &str) -> Option<&TickerEntry> {
        self.tickers
            .iter()
            .find(|t| t.symbol.eq_ignore_ascii_case(symbol))
    }

    /// Entries whose symbol or name contains `query`, ignoring case.
    ///
    /// A blank query suggests nothing.
    pub fn suggest(&self, query: &str) -> Vec<&TickerEntry> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.tickers
            .iter()
            .filter(|t| {
                t.symbol.to_lowercase().contains(&needle) || t.name.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Default catalog: US large caps plus a few NSE listings.
    pub fn default_catalog() -> Self {
        let tickers = [
            ("AAPL", "Apple Inc."),
            ("GOOG", "Alphabet Inc. (Google)"),
            ("MSFT", "Microsoft Corporation"),
            ("TSLA", "Tesla Inc."),
            ("AMZN", "Amazon.com Inc."),
            ("GME", "GameStop Corp."),
            ("ZOMATO.NS", "Zomato Ltd (India)"),
            ("RELIANCE.NS", "Reliance Industries (India)"),
            ("TATASTEEL.NS", "Tata Steel Ltd (India)"),
            ("HDFCBANK.NS", "HDFC Bank Ltd (India)"),
        ]
        .into_iter()
        .map(|(s, n)| TickerEntry::new(s, n))
        .collect();

        Self { tickers }
    }
}

impl Default for TickerCatalog {
    fn default() -> Self {
        Self::default_catalog()
    }
}
