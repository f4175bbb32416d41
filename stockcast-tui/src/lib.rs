//! StockCast TUI: terminal dashboard over the memoized forecast pipeline.
//!
//! Panels:
//! 1. Input: stock list + custom ticker, date range, horizon slider
//! 2. Data: raw price tail, table shape, training tail
//! 3. Prices: open/close chart with a zoomable range track
//! 4. Forecast: predicted values with bounds, forecast tail
//! 5. Components: trend, weekly, yearly
//!
//! The main thread owns `AppState`; a single worker thread owns the `Pipeline`.

pub mod app;
pub mod input;
pub mod persistence;
pub mod theme;
pub mod ui;
pub mod worker;

pub use app::AppState;
pub use theme::Theme;
