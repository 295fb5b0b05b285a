mod market_data;
mod signal_engine;

pub use market_data::{
    placeholder_price, MarketDataClient, DEFAULT_PLACEHOLDER_PRICE, PLACEHOLDER_PRICES,
};
pub use signal_engine::SignalEngineClient;

use crate::error::Result;
use crate::models::{MarketSnapshot, SignalRequest, TradingSignal};

use async_trait::async_trait;
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter as GovRateLimiter,
};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use std::num::NonZeroU32;

/// Quote source seam. Lets the orchestrator run against test doubles.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn fetch_quotes(&self, symbols: &[String]) -> MarketSnapshot;
}

/// Generative signal engine seam.
#[async_trait]
pub trait SignalGenerator: Send + Sync {
    async fn generate(&self, request: &SignalRequest) -> Result<Vec<TradingSignal>>;
}

pub struct RateLimiter {
    limiter: GovRateLimiter<NotKeyed, InMemoryState, DefaultClock>,
}

impl RateLimiter {
    pub fn new(requests_per_minute: u32) -> Self {
        let quota = Quota::per_minute(NonZeroU32::new(requests_per_minute.max(1)).unwrap());
        Self {
            limiter: GovRateLimiter::direct(quota),
        }
    }

    pub async fn acquire(&self) {
        self.limiter.until_ready().await;
    }
}

fn default_client() -> reqwest::Client {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)"),
    );

    reqwest::Client::builder()
        .default_headers(headers)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
