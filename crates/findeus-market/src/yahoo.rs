// SPDX-FileCopyrightText: 2026 FinDeus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Yahoo Finance chart API quote source.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use tracing::debug;

use findeus_config::FinDeusConfig;
use findeus_core::traits::{PluginAdapter, QuoteSource};
use findeus_core::types::{AdapterType, HealthStatus, Quote};
use findeus_core::FinDeusError;

use crate::symbol::normalize_symbol;

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    symbol: String,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    long_name: Option<String>,
    #[serde(default)]
    short_name: Option<String>,
    #[serde(default)]
    regular_market_price: Option<f64>,
    #[serde(default)]
    previous_close: Option<f64>,
    #[serde(default)]
    chart_previous_close: Option<f64>,
    #[serde(default)]
    regular_market_volume: Option<u64>,
    #[serde(default)]
    regular_market_time: Option<i64>,
}

impl ChartMeta {
    fn into_quote(self) -> Result<Quote, FinDeusError> {
        let price = self
            .regular_market_price
            .ok_or_else(|| market_error(format!("no price in chart data for {}", self.symbol)))?;
        let previous = self.previous_close.or(self.chart_previous_close);
        let change = previous.map(|p| price - p).unwrap_or(0.0);
        let change_percent = match previous {
            Some(p) if p != 0.0 => change / p * 100.0,
            _ => 0.0,
        };
        let timestamp = self
            .regular_market_time
            .and_then(|t| DateTime::<Utc>::from_timestamp(t, 0))
            .unwrap_or_else(Utc::now);

        Ok(Quote {
            name: self
                .long_name
                .or(self.short_name)
                .unwrap_or_else(|| self.symbol.clone()),
            symbol: self.symbol,
            price,
            change,
            change_percent,
            volume: self.regular_market_volume.unwrap_or(0),
            currency: self.currency,
            timestamp,
        })
    }
}

fn market_error(message: impl Into<String>) -> FinDeusError {
    FinDeusError::MarketData {
        message: message.into(),
        source: None,
    }
}

/// Quote source backed by `GET {base_url}/v8/finance/chart/{SYMBOL}`.
#[derive(Debug, Clone)]
pub struct YahooQuoteSource {
    client: reqwest::Client,
    base_url: String,
}

impl YahooQuoteSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FinDeusError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            HeaderValue::from_static(concat!("findeus/", env!("CARGO_PKG_VERSION"))),
        );
        headers.insert("accept", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| FinDeusError::MarketData {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Builds the source from `market.base_url` and `router.timeout_secs`.
    pub fn from_config(config: &FinDeusConfig) -> Result<Self, FinDeusError> {
        Self::new(
            &config.market.base_url,
            Duration::from_secs(config.router.timeout_secs),
        )
    }

    fn chart_url(&self, symbol: &str) -> String {
        format!("{}/v8/finance/chart/{symbol}", self.base_url)
    }
}

#[async_trait]
impl PluginAdapter for YahooQuoteSource {
    fn name(&self) -> &str {
        "yahoo-finance"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::MarketData
    }

    async fn health_check(&self) -> Result<HealthStatus, FinDeusError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl QuoteSource for YahooQuoteSource {
    async fn quote(&self, symbol: &str) -> Result<Quote, FinDeusError> {
        let symbol = normalize_symbol(symbol)?;

        let response = self
            .client
            .get(self.chart_url(&symbol))
            .query(&[("interval", "1d"), ("range", "1d")])
            .send()
            .await
            .map_err(|e| FinDeusError::MarketData {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, symbol = %symbol, "chart response received");

        let body = response.text().await.map_err(|e| FinDeusError::MarketData {
            message: format!("failed to read response body: {e}"),
            source: Some(Box::new(e)),
        })?;

        let envelope: ChartEnvelope = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(market_error(format!("chart API returned {status}")));
            }
            Err(e) => {
                return Err(FinDeusError::MarketData {
                    message: format!("failed to parse chart response: {e}"),
                    source: Some(Box::new(e)),
                });
            }
        };

        if let Some(err) = envelope.chart.error {
            return Err(market_error(format!(
                "chart API error ({}): {}",
                err.code.as_deref().unwrap_or("unknown"),
                err.description.as_deref().unwrap_or("no description")
            )));
        }
        if !status.is_success() {
            return Err(market_error(format!("chart API returned {status}")));
        }

        envelope
            .chart
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| market_error(format!("no chart data for {symbol}")))?
            .meta
            .into_quote()
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn chart_body(symbol: &str) -> serde_json::Value {
        serde_json::json!({
            "chart": {
                "result": [{
                    "meta": {
                        "symbol": symbol,
                        "currency": "USD",
                        "longName": "Apple Inc.",
                        "shortName": "Apple",
                        "regularMarketPrice": 190.5,
                        "chartPreviousClose": 188.0,
                        "regularMarketVolume": 51234567u64,
                        "regularMarketTime": 1717185600i64
                    },
                    "timestamp": [1717185600i64],
                    "indicators": {"quote": [{}]}
                }],
                "error": null
            }
        })
    }

    fn source(server: &MockServer) -> YahooQuoteSource {
        YahooQuoteSource::new(&server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn maps_chart_meta_to_quote() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v8/finance/chart/AAPL"))
            .and(query_param("interval", "1d"))
            .and(query_param("range", "1d"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chart_body("AAPL")))
            .mount(&server)
            .await;

        let quote = source(&server).quote("aapl").await.unwrap();
        assert_eq!(quote.symbol, "AAPL");
        assert_eq!(quote.name, "Apple Inc.");
        assert!((quote.price - 190.5).abs() < 1e-9);
        assert!((quote.change - 2.5).abs() < 1e-9);
        assert!((quote.change_percent - 2.5 / 188.0 * 100.0).abs() < 1e-9);
        assert_eq!(quote.volume, 51_234_567);
        assert_eq!(quote.currency.as_deref(), Some("USD"));
        assert_eq!(quote.timestamp.timestamp(), 1_717_185_600);
    }

    #[tokio::test]
    async fn invalid_symbol_never_reaches_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chart_body("X")))
            .expect(0)
            .mount(&server)
            .await;

        let err = source(&server).quote("A/B").await.unwrap_err();
        assert!(err.is_client_error());
    }

    #[tokio::test]
    async fn chart_error_is_market_data_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "chart": {
                    "result": null,
                    "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}
                }
            })))
            .mount(&server)
            .await;

        let err = source(&server).quote("ZZZZ").await.unwrap_err();
        assert!(matches!(err, FinDeusError::MarketData { .. }));
        assert!(err.to_string().contains("symbol may be delisted"), "got: {err}");
    }

    #[tokio::test]
    async fn non_json_error_reports_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let err = source(&server).quote("AAPL").await.unwrap_err();
        assert!(err.to_string().contains("502"), "got: {err}");
    }

    #[tokio::test]
    async fn missing_price_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "chart": {"result": [{"meta": {"symbol": "AAPL"}}], "error": null}
            })))
            .mount(&server)
            .await;

        let err = source(&server).quote("AAPL").await.unwrap_err();
        assert!(err.to_string().contains("no price"));
    }

    #[tokio::test]
    async fn falls_back_to_short_name_and_previous_close() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "chart": {"result": [{"meta": {
                    "symbol": "^GSPC",
                    "shortName": "S&P 500",
                    "regularMarketPrice": 5000.0,
                    "previousClose": 5100.0
                }}], "error": null}
            })))
            .mount(&server)
            .await;

        let quote = source(&server).quote("^gspc").await.unwrap();
        assert_eq!(quote.name, "S&P 500");
        assert!((quote.change + 100.0).abs() < 1e-9);
        assert_eq!(quote.volume, 0);
        assert!(quote.currency.is_none());
    }
}
