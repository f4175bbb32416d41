//! Yahoo Finance data provider.
//!
//! Fetches daily OHLCV records from Yahoo's v8 chart API. One request per
//! fetch, no retries: failures are reported to the caller as they happen.
//!
//! Yahoo Finance has no official API and is subject to unannounced format changes.

use std::time::Duration;

use chrono::NaiveDate;
use serde::Deserialize;

use super::provider::{DataError, DataProvider, DataSource, FetchResult};
use crate::domain::PriceRecord;

pub const DEFAULT_BASE_URL: &str = "https://query2.finance.yahoo.com";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
    adjclose: Option<Vec<AdjCloseData>>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteData {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseData {
    adjclose: Vec<Option<f64>>,
}

/// Connection settings for the Yahoo provider.
#[derive(Debug, Clone)]
pub struct YahooConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Yahoo Finance data provider.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
    base_url: reqwest::Url,
}

impl YahooProvider {
    pub fn new(config: YahooConfig) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| DataError::Client(e.to_string()))?;
        let base_url = reqwest::Url::parse(&config.base_url)
            .map_err(|e| DataError::Client(format!("invalid base url {}: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(DataError::Client(format!("base url cannot take a path: {base_url}")));
        }

        Ok(Self { client, base_url })
    }

    /// Build the chart API URL for a symbol and date range.
    ///
    /// The symbol is a single percent-encoded path segment, so `/`, `?` and
    /// `#` in it cannot change the path or the query.
    fn chart_url(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<reqwest::Url, DataError> {
        let start_ts = start.and_time(chrono::NaiveTime::MIN).and_utc().timestamp();
        // period2 is exclusive on Yahoo's side; push it to the end of `end`.
        let end_ts = end
            .succ_opt()
            .unwrap_or(end)
            .and_time(chrono::NaiveTime::MIN)
            .and_utc()
            .timestamp()
            - 1;

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| DataError::Client(format!("base url cannot take a path: {}", self.base_url)))?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", symbol]);
        url.query_pairs_mut()
            .append_pair("period1", &start_ts.to_string())
            .append_pair("period2", &end_ts.to_string())
            .append_pair("interval", "1d")
            .append_pair("includeAdjustedClose", "true");
        Ok(url)
    }
}

/// Parse a chart API body into PriceRecords.
///
/// A result without timestamps is an empty range, not an error.
pub(crate) fn parse_chart(symbol: &str, body: &str) -> Result<Vec<PriceRecord>, DataError> {
    let resp: ChartResponse = serde_json::from_str(body).map_err(|e| {
        DataError::ResponseFormatChanged(format!("failed to parse response for {symbol}: {e}"))
    })?;

    let result = match resp.chart.result {
        Some(result) => result,
        None => {
            return Err(match resp.chart.error {
                Some(err) if err.code == "Not Found" => DataError::SymbolNotFound {
                    symbol: symbol.to_string(),
                },
                Some(err) => {
                    DataError::ResponseFormatChanged(format!("{}: {}", err.code, err.description))
                }
                None => DataError::ResponseFormatChanged("empty result with no error".into()),
            })
        }
    };

    let Some(data) = result.into_iter().next() else {
        return Ok(Vec::new());
    };
    let Some(timestamps) = data.timestamp else {
        return Ok(Vec::new());
    };

    let quote = data.indicators.quote.into_iter().next().unwrap_or_default();
    let adj_closes = data
        .indicators
        .adjclose
        .and_then(|v| v.into_iter().next())
        .map(|a| a.adjclose);

    let mut records = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let date = chrono::DateTime::from_timestamp(ts, 0)
            .map(|dt| dt.naive_utc().date())
            .ok_or_else(|| DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}")))?;

        let open = quote.open.get(i).copied().flatten();
        let high = quote.high.get(i).copied().flatten();
        let low = quote.low.get(i).copied().flatten();
        let close = quote.close.get(i).copied().flatten();
        let volume = quote.volume.get(i).copied().flatten();
        let adjusted_close = adj_closes.as_ref().and_then(|v| v.get(i).copied().flatten());

        // Holidays and halted sessions come back as all-null rows.
        if open.is_none() && high.is_none() && low.is_none() && close.is_none() && volume.is_none()
        {
            continue;
        }

        records.push(PriceRecord {
            date,
            open: open.unwrap_or(f64::NAN),
            high: high.unwrap_or(f64::NAN),
            low: low.unwrap_or(f64::NAN),
            close: close.unwrap_or(f64::NAN),
            adjusted_close: adjusted_close.unwrap_or(f64::NAN),
            volume: volume.unwrap_or(0),
        });
    }

    Ok(records)
}

impl DataProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        let url = self.chart_url(symbol, start, end)?;
        tracing::debug!(%symbol, %start, %end, "requesting chart data");

        let resp = self.client.get(url).send().map_err(|e| {
            tracing::warn!(%symbol, error = %e, "chart request failed");
            DataError::NetworkUnreachable(e.to_string())
        })?;

        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(DataError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        let body = resp
            .text()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;

        // Unknown symbols answer 404 with a chart.error body.
        if status == reqwest::StatusCode::NOT_FOUND {
            return match parse_chart(symbol, &body) {
                Err(e) if e.is_not_found() => Err(e),
                _ => Err(DataError::SymbolNotFound {
                    symbol: symbol.to_string(),
                }),
            };
        }
        if !status.is_success() {
            return Err(DataError::HttpStatus {
                symbol: symbol.to_string(),
                status: status.as_u16(),
            });
        }

        let records = parse_chart(symbol, &body)?;
        tracing::debug!(%symbol, rows = records.len(), "chart data parsed");

        Ok(FetchResult {
            symbol: symbol.to_string(),
            records,
            source: DataSource::YahooFinance,
        })
    }
}
