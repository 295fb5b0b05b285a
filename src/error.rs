use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Market data API error: {0}")]
    MarketApi(String),

    #[error("Signal engine API error: {0}")]
    SignalEngine(String),

    #[error("Signal validation failed: {0}")]
    SignalValidation(String),

    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
