//! Domain types for StockCast

pub mod forecast;
pub mod price;
pub mod sentiment;
pub mod series;

pub use forecast::{ComponentPoint, Forecast, ForecastPoint};
pub use price::{PriceRecord, PRICE_COLUMNS};
pub use sentiment::{Direction, Sentiment};
pub use series::TrainingPoint;
