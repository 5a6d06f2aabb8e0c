//! Yahoo Finance market data provider.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracker_core::error::DataError;
use tracker_core::traits::MarketDataProvider;
use tracker_core::types::{Interval, Period, RawBar, SymbolMetadata};
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Yahoo rejects requests without a browser-like user agent.
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) rsi-tracker/0.1";

/// Yahoo Finance client configuration.
#[derive(Debug, Clone)]
pub struct YahooConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl YahooConfig {
    /// Create config for a base URL with default timeout and user agent.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Chart API response types
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Option<ChartIndicators>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    regular_market_price: Option<f64>,
    long_name: Option<String>,
    short_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Default, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    volume: Option<Vec<Option<f64>>>,
}

/// Quote API response types
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteResponse {
    quote_response: QuoteBody,
}

#[derive(Debug, Deserialize)]
struct QuoteBody {
    #[serde(default)]
    result: Vec<QuoteResult>,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteResult {
    regular_market_price: Option<f64>,
    shares_outstanding: Option<u64>,
    market_cap: Option<u64>,
    long_name: Option<String>,
    short_name: Option<String>,
}

/// Yahoo Finance provider.
pub struct YahooProvider {
    config: YahooConfig,
    client: Client,
}

impl YahooProvider {
    /// Create a new Yahoo Finance client.
    pub fn new(config: YahooConfig) -> Result<Self, DataError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()
            .map_err(|e| DataError::Connection(e.to_string()))?;

        Ok(Self { config, client })
    }

    async fn get_chart(
        &self,
        symbol: &str,
        range: Period,
        interval: Interval,
    ) -> Result<ChartResult, DataError> {
        let url = format!("{}/v8/finance/chart/{}", self.config.base_url, symbol);

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("range", range.as_str()),
                ("interval", interval.as_str()),
                ("includePrePost", "false"),
            ])
            .send()
            .await
            .map_err(|e| DataError::Connection(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| DataError::Connection(e.to_string()))?;

        // Error bodies share the chart envelope, so parse before the status check
        let parsed: Result<ChartResponse, _> = serde_json::from_str(&text);
        if let Ok(ChartResponse {
            chart: ChartBody { error: Some(err), .. },
        }) = &parsed
        {
            return Err(api_error(symbol, err));
        }

        if !status.is_success() {
            return Err(status_error(symbol, status, &text));
        }

        parsed
            .map_err(|e| DataError::Parse(e.to_string()))?
            .chart
            .result
            .and_then(|mut results| results.pop())
            .ok_or(DataError::NoDataAvailable)
    }

    async fn get_quote(&self, symbol: &str) -> Result<SymbolMetadata, DataError> {
        let url = format!("{}/v7/finance/quote", self.config.base_url);

        let resp = self
            .client
            .get(&url)
            .query(&[("symbols", symbol)])
            .send()
            .await
            .map_err(|e| DataError::Connection(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(status_error(symbol, status, &text));
        }

        let data: QuoteResponse = resp
            .json()
            .await
            .map_err(|e| DataError::Parse(e.to_string()))?;

        if let Some(err) = &data.quote_response.error {
            return Err(api_error(symbol, err));
        }

        // An unknown symbol comes back as an empty result list
        Ok(data
            .quote_response
            .result
            .into_iter()
            .next()
            .map(|q| SymbolMetadata {
                current_price: None,
                regular_market_price: q.regular_market_price,
                shares_outstanding: q.shares_outstanding,
                market_cap: q.market_cap,
                long_name: q.long_name.or(q.short_name),
            })
            .unwrap_or_default())
    }
}

fn api_error(symbol: &str, err: &ApiErrorBody) -> DataError {
    if err.code.eq_ignore_ascii_case("Not Found") {
        DataError::SymbolNotFound(symbol.to_string())
    } else {
        DataError::Api(format!(
            "{}: {}",
            err.code,
            err.description.as_deref().unwrap_or_default()
        ))
    }
}

fn status_error(symbol: &str, status: StatusCode, text: &str) -> DataError {
    if status == StatusCode::NOT_FOUND {
        DataError::SymbolNotFound(symbol.to_string())
    } else {
        DataError::Api(format!("{}: {}", status, text))
    }
}

/// Zip the chart's column arrays into bars.
fn chart_to_bars(result: ChartResult) -> Vec<RawBar> {
    let quote = result
        .indicators
        .and_then(|i| i.quote.into_iter().next())
        .unwrap_or_default();

    let at = |column: &[Option<f64>], i: usize| column.get(i).copied().flatten();

    result
        .timestamp
        .iter()
        .enumerate()
        .map(|(i, ts)| RawBar {
            timestamp: ts * 1000,
            open: at(&quote.open, i),
            high: at(&quote.high, i),
            low: at(&quote.low, i),
            close: at(&quote.close, i),
            volume: quote.volume.as_deref().and_then(|v| at(v, i)),
        })
        .collect()
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    async fn history(
        &self,
        symbol: &str,
        window: Period,
        interval: Option<Interval>,
    ) -> Result<Vec<RawBar>, DataError> {
        let interval = interval.unwrap_or(Interval::Daily);
        debug!(symbol, %window, %interval, "Requesting chart");

        match self.get_chart(symbol, window, interval).await {
            Ok(result) => Ok(chart_to_bars(result)),
            Err(DataError::NoDataAvailable) => Ok(vec![]),
            Err(e) => Err(e),
        }
    }

    async fn metadata(&self, symbol: &str) -> Result<SymbolMetadata, DataError> {
        match self.get_quote(symbol).await {
            Ok(meta) => Ok(meta),
            Err(DataError::SymbolNotFound(s)) => Err(DataError::SymbolNotFound(s)),
            Err(e) => {
                // The quote endpoint wants a session crumb; the chart meta
                // still carries the market price and name.
                debug!(symbol, error = %e, "Quote lookup failed, reading chart meta");
                let chart = self.get_chart(symbol, Period::Day1, Interval::Daily).await?;
                Ok(SymbolMetadata {
                    current_price: None,
                    regular_market_price: chart.meta.regular_market_price,
                    shares_outstanding: None,
                    market_cap: None,
                    long_name: chart.meta.long_name.or(chart.meta.short_name),
                })
            }
        }
    }

    fn name(&self) -> &str {
        "Yahoo Finance"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_to_bars() {
        let body = r#"{
            "chart": {
                "result": [{
                    "meta": {"regularMarketPrice": 191.2, "longName": "Apple Inc."},
                    "timestamp": [1700000000, 1700086400, 1700172800],
                    "indicators": {"quote": [{
                        "open": [189.0, 190.0, null],
                        "high": [190.5, 191.0, null],
                        "low": [188.0, 189.5, null],
                        "close": [190.0, 191.2, null],
                        "volume": [51000000, 48000000, null]
                    }]}
                }],
                "error": null
            }
        }"#;
        let parsed: ChartResponse = serde_json::from_str(body).unwrap();
        let result = parsed.chart.result.unwrap().pop().unwrap();
        assert_eq!(result.meta.regular_market_price, Some(191.2));

        let bars = chart_to_bars(result);
        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].timestamp, 1_700_000_000_000);
        assert_eq!(bars[1].close, Some(191.2));
        assert_eq!(bars[1].volume, Some(48_000_000.0));
        assert_eq!(bars[2].close, None);
    }

    #[test]
    fn test_chart_without_volume_column() {
        let body = r#"{
            "chart": {
                "result": [{
                    "meta": {},
                    "timestamp": [1700000000],
                    "indicators": {"quote": [{"close": [10.5]}]}
                }],
                "error": null
            }
        }"#;
        let parsed: ChartResponse = serde_json::from_str(body).unwrap();
        let bars = chart_to_bars(parsed.chart.result.unwrap().pop().unwrap());
        assert_eq!(bars[0].close, Some(10.5));
        assert_eq!(bars[0].volume, None);
        assert_eq!(bars[0].open, None);
    }

    #[test]
    fn test_chart_error_body() {
        let body = r#"{"chart": {"result": null, "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}}}"#;
        let parsed: ChartResponse = serde_json::from_str(body).unwrap();
        let err = api_error("ZZZZ", parsed.chart.error.as_ref().unwrap());
        assert!(matches!(err, DataError::SymbolNotFound(s) if s == "ZZZZ"));

        let other = ApiErrorBody {
            code: "Bad Request".into(),
            description: Some("Invalid input - interval=5m is not supported".into()),
        };
        assert!(matches!(api_error("AAPL", &other), DataError::Api(_)));
    }

    #[test]
    fn test_quote_response_parse() {
        let body = r#"{"quoteResponse": {"result": [{
            "symbol": "MSFT",
            "regularMarketPrice": 420.5,
            "sharesOutstanding": 7430000000,
            "marketCap": 3124315000000,
            "longName": "Microsoft Corporation"
        }], "error": null}}"#;
        let parsed: QuoteResponse = serde_json::from_str(body).unwrap();
        let quote = &parsed.quote_response.result[0];
        assert_eq!(quote.regular_market_price, Some(420.5));
        assert_eq!(quote.shares_outstanding, Some(7_430_000_000));
        assert_eq!(quote.market_cap, Some(3_124_315_000_000));
    }

    #[test]
    fn test_config_trims_base_url() {
        let config = YahooConfig::new("http://localhost:8080/").with_timeout(Duration::from_secs(3));
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert!(YahooProvider::new(config).is_ok());
    }
}
