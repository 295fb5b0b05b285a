use crate::config::MarketDataConfig;
use crate::error::{AppError, Result};
use crate::models::{format_price, CatalogEntry, MarketSnapshot, Quote};

use super::{default_client, QuoteSource, RateLimiter};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{info, warn};

const API_KEY_HEADER: &str = "X-CMC_PRO_API_KEY";

/// Ordered placeholder baselines, first match wins.
pub const PLACEHOLDER_PRICES: &[(&str, f64)] = &[("ETH", 3000.0), ("SOL", 150.0)];
pub const DEFAULT_PLACEHOLDER_PRICE: f64 = 50000.0;

pub fn placeholder_price(symbol: &str) -> f64 {
    PLACEHOLDER_PRICES
        .iter()
        .find(|(s, _)| *s == symbol)
        .map(|(_, price)| *price)
        .unwrap_or(DEFAULT_PLACEHOLDER_PRICE)
}

#[derive(Debug, Deserialize)]
struct ApiStatus {
    #[serde(default)]
    timestamp: String,
    error_code: i64,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QuotesResponse {
    status: ApiStatus,
    #[serde(default)]
    data: HashMap<String, Vec<QuoteRecord>>,
}

#[derive(Debug, Deserialize)]
struct QuoteRecord {
    name: String,
    symbol: String,
    quote: HashMap<String, QuoteValues>,
}

#[derive(Debug, Deserialize)]
struct QuoteValues {
    price: f64,
    volume_24h: f64,
    percent_change_24h: f64,
    market_cap: f64,
}

#[derive(Debug, Deserialize)]
struct CatalogResponse {
    status: ApiStatus,
    #[serde(default)]
    data: Vec<CatalogEntry>,
}

pub struct MarketDataClient {
    client: reqwest::Client,
    config: MarketDataConfig,
    rate_limiter: RateLimiter,
}

impl MarketDataClient {
    pub fn new(config: MarketDataConfig) -> Self {
        let rate_limiter = RateLimiter::new(config.requests_per_minute);
        Self {
            client: default_client(),
            config,
            rate_limiter,
        }
    }

    /// Full active-coin universe in one call. Returns an empty list when no
    /// API key is configured; provider failures surface as typed errors.
    pub async fn fetch_catalog(&self) -> Result<Vec<CatalogEntry>> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            warn!("CRYPTO_API_KEY is not set, returning empty coin catalog");
            return Ok(Vec::new());
        };

        self.rate_limiter.acquire().await;

        let url = format!(
            "{}/v1/cryptocurrency/map?listing_status=active&limit={}&aux=first_historical_data",
            self.config.base_url, self.config.catalog_limit
        );

        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::MarketApi(format!("Status {}: {}", status, text)));
        }

        let result: CatalogResponse = response.json().await?;

        if result.status.error_code != 0 {
            return Err(AppError::MarketApi(
                result
                    .status
                    .error_message
                    .unwrap_or_else(|| "Unknown API error".to_string()),
            ));
        }

        info!("Fetched {} catalog entries", result.data.len());
        Ok(result.data)
    }

    async fn live_quotes(&self, symbols: &[String], api_key: &str) -> Result<MarketSnapshot> {
        self.rate_limiter.acquire().await;

        let url = format!(
            "{}/v2/cryptocurrency/quotes/latest?symbol={}&convert=USD",
            self.config.base_url,
            symbols.join(",")
        );

        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::MarketApi(format!("Status {}: {}", status, text)));
        }

        let result: QuotesResponse = response.json().await?;

        if result.status.error_code != 0 {
            return Err(AppError::MarketApi(
                result
                    .status
                    .error_message
                    .unwrap_or_else(|| "Unknown API error".to_string()),
            ));
        }

        Ok(snapshot_from_response(symbols, result))
    }
}

#[async_trait]
impl QuoteSource for MarketDataClient {
    /// Quotes for every requested symbol. Never fails: a missing key or a
    /// provider error degrades to placeholder prices, with the condition
    /// noted in the summary.
    async fn fetch_quotes(&self, symbols: &[String]) -> MarketSnapshot {
        let Some(api_key) = self.config.api_key.as_deref() else {
            warn!(
                "CRYPTO_API_KEY is not set, using placeholder data for {}",
                symbols.join(",")
            );
            return placeholder_snapshot(symbols);
        };

        match self.live_quotes(symbols, api_key).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Quote fetch failed for {}: {}", symbols.join(","), e);
                degraded_snapshot(symbols, &e)
            }
        }
    }
}

/// Builds the summary and price map from a successful provider response.
/// Symbols the provider skipped stay in the map as `None`.
fn snapshot_from_response(symbols: &[String], response: QuotesResponse) -> MarketSnapshot {
    let timestamp = DateTime::parse_from_rfc3339(&response.status.timestamp)
        .map(|t| t.with_timezone(&Utc).format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|_| response.status.timestamp.clone());

    let mut summary = format!(
        "Market data for {} from CoinMarketCap. Timestamp: {}. ",
        symbols.join(","),
        timestamp
    );
    let mut prices = HashMap::new();

    for symbol in symbols {
        let record = response
            .data
            .get(symbol)
            .and_then(|records| records.first());

        match record.and_then(|r| r.quote.get("USD").map(|usd| (r, usd))) {
            Some((record, usd)) => {
                let quote = Quote {
                    symbol: record.symbol.clone(),
                    name: record.name.clone(),
                    price: usd.price,
                    volume_24h: usd.volume_24h,
                    percent_change_24h: usd.percent_change_24h,
                    market_cap: usd.market_cap,
                    as_of: timestamp.clone(),
                };
                summary.push_str(&quote.summary_line());
                prices.insert(symbol.clone(), Some(usd.price));
            }
            None => {
                summary.push_str(&format!("{} data not available from API. ", symbol));
                prices.insert(symbol.clone(), None);
            }
        }
    }

    MarketSnapshot {
        summary: summary.trim_end().to_string(),
        prices,
    }
}

/// Deterministic snapshot used when no API key is configured. No network
/// I/O happens on this path.
fn placeholder_snapshot(symbols: &[String]) -> MarketSnapshot {
    let mut summary = format!(
        "Placeholder Data: Timestamp: {}. Please configure your CoinMarketCap API key.",
        Utc::now().to_rfc3339()
    );
    let mut prices = HashMap::new();

    for symbol in symbols {
        let price = placeholder_price(symbol);
        summary.push_str(&format!(
            " {} is around ${}. Market is stable.",
            symbol,
            format_price(price)
        ));
        prices.insert(symbol.clone(), Some(price));
    }

    MarketSnapshot { summary, prices }
}

/// Fallback after a failed provider call: placeholder prices for every
/// symbol plus an explicit error annotation on the summary.
fn degraded_snapshot(symbols: &[String], error: &AppError) -> MarketSnapshot {
    let mut summary = format!("Market data for {} from CoinMarketCap. ", symbols.join(","));
    let mut prices = HashMap::new();

    for symbol in symbols {
        let price = placeholder_price(symbol);
        summary.push_str(&format!(
            "{} using placeholder due to API error. Price: ${}. ",
            symbol,
            format_price(price)
        ));
        prices.insert(symbol.clone(), Some(price));
    }

    summary.push_str(&format!("ERROR_NOTE: {}", error));
    MarketSnapshot { summary, prices }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_placeholder_price_table() {
        assert!((placeholder_price("ETH") - 3000.0).abs() < 0.001);
        assert!((placeholder_price("SOL") - 150.0).abs() < 0.001);
        assert!((placeholder_price("BTC") - 50000.0).abs() < 0.001);
        assert!((placeholder_price("XYZ") - 50000.0).abs() < 0.001);
    }

    #[test]
    fn test_placeholder_snapshot_covers_every_symbol() {
        let requested = symbols(&["BTC", "ETH", "SOL", "XYZ"]);
        let snapshot = placeholder_snapshot(&requested);

        assert_eq!(snapshot.prices.len(), requested.len());
        for symbol in &requested {
            assert!(snapshot.prices[symbol].is_some());
            assert!(snapshot.summary.contains(symbol.as_str()));
        }
        assert_eq!(snapshot.prices["ETH"], Some(3000.0));
        assert_eq!(snapshot.prices["XYZ"], Some(50000.0));
        assert!(snapshot.summary.contains("Placeholder Data"));
    }

    #[test]
    fn test_degraded_snapshot_annotates_error() {
        let requested = symbols(&["BTC", "DOGE"]);
        let error = AppError::MarketApi("Status 500: upstream down".to_string());
        let snapshot = degraded_snapshot(&requested, &error);

        assert_eq!(snapshot.prices.len(), 2);
        assert_eq!(snapshot.prices["BTC"], Some(50000.0));
        assert!(snapshot.summary.contains("BTC using placeholder due to API error"));
        assert!(snapshot.summary.contains("ERROR_NOTE: Market data API error"));
    }

    #[test]
    fn test_snapshot_from_response_handles_missing_symbols() {
        let json = r#"{
            "status": {
                "timestamp": "2026-08-25T10:00:00.000Z",
                "error_code": 0,
                "error_message": null
            },
            "data": {
                "BTC": [{
                    "name": "Bitcoin",
                    "symbol": "BTC",
                    "quote": {
                        "USD": {
                            "price": 64250.5,
                            "volume_24h": 38000000000.0,
                            "percent_change_24h": -1.25,
                            "market_cap": 1260000000000.0
                        }
                    }
                }]
            }
        }"#;

        let response: QuotesResponse = serde_json::from_str(json).unwrap();
        let snapshot = snapshot_from_response(&symbols(&["BTC", "XYZ"]), response);

        assert_eq!(snapshot.prices["BTC"], Some(64250.5));
        assert_eq!(snapshot.prices["XYZ"], None);
        assert!(snapshot.summary.contains("Current Bitcoin (BTC) price is $64250.50"));
        assert!(snapshot.summary.contains("XYZ data not available from API."));
        assert!(snapshot.summary.contains("2026-08-25 10:00:00 UTC"));
    }

    #[test]
    fn test_catalog_envelope_parses() {
        let json = r#"{
            "status": {
                "timestamp": "2026-08-25T10:00:00.000Z",
                "error_code": 0,
                "error_message": null
            },
            "data": [
                {"id": 1, "name": "Bitcoin", "symbol": "BTC",
                 "first_historical_data": "2013-04-28T18:47:21.000Z"},
                {"id": 0, "name": "", "symbol": ""}
            ]
        }"#;

        let response: CatalogResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.data.len(), 2);
        assert!(response.data[0].is_complete());
        assert!(!response.data[1].is_complete());
    }

    #[test]
    fn test_catalog_envelope_tolerates_null_fields() {
        // One bad record must not take down the other 5000.
        let json = r#"{
            "status": {
                "timestamp": "2026-08-25T10:00:00.000Z",
                "error_code": 0,
                "error_message": null
            },
            "data": [
                {"id": 1, "name": "Bitcoin", "symbol": "BTC",
                 "first_historical_data": "2013-04-28T18:47:21.000Z"},
                {"id": null, "name": "Nullid", "symbol": "NID"},
                {"id": 7, "name": null, "symbol": "NNM"},
                {"id": 8, "name": "Nullsym", "symbol": null}
            ]
        }"#;

        let response: CatalogResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.data.len(), 4);
        assert!(response.data[0].is_complete());
        for entry in &response.data[1..] {
            assert!(!entry.is_complete());
        }
    }
}
