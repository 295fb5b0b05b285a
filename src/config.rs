use config::{Config, ConfigError, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub market_data: MarketDataConfig,
    pub signal_engine: SignalEngineConfig,
    pub request: RequestConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MarketDataConfig {
    pub base_url: String,
    pub catalog_limit: u32,
    pub requests_per_minute: u32,
    #[serde(skip)]
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SignalEngineConfig {
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub requests_per_minute: u32,
    #[serde(skip)]
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RequestConfig {
    pub default_symbol: String,
    pub default_term: String,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .build()?;

        let mut settings: Settings = config.try_deserialize()?;

        // API keys come from the environment only. A missing market data key
        // selects placeholder mode; a missing engine key surfaces per request.
        settings.market_data.api_key = env::var("CRYPTO_API_KEY").ok();
        settings.signal_engine.api_key = env::var("SIGNAL_API_KEY").ok();

        Ok(settings)
    }
}
