//! StockCast Core: domain types, market data, input resolution, series preparation, forecasting.
//!
//! This crate contains everything below the pipeline:
//! - Domain types (price records, training points, forecast points, sentiment)
//! - `DataProvider` trait with Yahoo chart and synthetic implementations
//! - Ticker catalog and suggestions
//! - Input resolution (ticker choice + date range + probe fetch)
//! - Series preparation (records → ordered, finite training series)
//! - `Forecaster` trait with additive and drift models
//! - Run fingerprinting

pub mod data;
pub mod domain;
pub mod fingerprint;
pub mod forecast;
pub mod prepare;
pub mod resolve;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: everything the TUI worker moves across threads is Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::PriceRecord>();
        require_sync::<domain::PriceRecord>();
        require_send::<domain::TrainingPoint>();
        require_sync::<domain::TrainingPoint>();
        require_send::<domain::Forecast>();
        require_sync::<domain::Forecast>();
        require_send::<domain::Sentiment>();
        require_sync::<domain::Sentiment>();

        require_send::<data::FetchResult>();
        require_sync::<data::FetchResult>();
        require_send::<data::DataError>();
        require_sync::<data::DataError>();
        require_send::<data::YahooProvider>();
        require_sync::<data::YahooProvider>();
        require_send::<data::SyntheticProvider>();
        require_sync::<data::SyntheticProvider>();

        require_send::<resolve::ResolveError>();
        require_sync::<resolve::ResolveError>();
        require_send::<prepare::PreparedSeries>();
        require_sync::<prepare::PreparedSeries>();

        require_send::<forecast::ForecastError>();
        require_sync::<forecast::ForecastError>();
        require_send::<forecast::AdditiveForecaster>();
        require_sync::<forecast::AdditiveForecaster>();
        require_send::<forecast::DriftForecaster>();
        require_sync::<forecast::DriftForecaster>();

        require_send::<fingerprint::RunFingerprint>();
        require_sync::<fingerprint::RunFingerprint>();
    }

    /// The forecaster seam is object safe and sees only the training series.
    #[test]
    fn forecaster_trait_is_object_safe() {
        fn _check(
            f: &dyn forecast::Forecaster,
            history: &[domain::TrainingPoint],
        ) -> Result<domain::Forecast, forecast::ForecastError> {
            f.forecast(history, 365)
        }
    }
}
