//! Market-data providers and the ticker catalog

pub mod catalog;
pub mod provider;
pub mod synthetic;
pub mod yahoo;

pub use catalog::{TickerCatalog, TickerEntry};
pub use provider::{DataError, DataProvider, DataSource, FetchResult};
pub use synthetic::SyntheticProvider;
pub use yahoo::{YahooConfig, YahooProvider};
