use crate::config::SignalEngineConfig;
use crate::error::{AppError, Result};
use crate::models::{SignalRequest, TradingSignal};

use super::{default_client, RateLimiter, SignalGenerator};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

const ANTHROPIC_VERSION: &str = "2023-06-01";

const SYSTEM_PROMPT: &str = "\
You are an expert cryptocurrency trading signal generator specializing in FUTURES trading.

Analyze the aggregated market data provided by the user and generate potential futures \
trading signals for the requested coin, suitable for the requested trading term. Consider \
technical indicators, market trends, social sentiment, and any provided customization settings.

Respond with ONLY a JSON array of signal objects. Each signal MUST be for futures trading \
and MUST include:
1. \"signalType\": \"BUY\" or \"SELL\".
2. \"sentiment\": \"BULLISH\" or \"BEARISH\".
3. \"confidenceLevel\": a number between 0 (low) and 1 (high).
4. \"entryPrice\": a specific numeric suggested entry price for the requested horizon.
5. \"targetPrice\": a specific numeric suggested take-profit price for the requested horizon.
6. \"stopLossPrice\": a specific numeric suggested stop-loss price for the requested horizon.
7. \"reason\": clear, concise rationale mentioning key indicators or patterns (e.g. RSI, \
MACD crossover, support/resistance break) relevant to the trading term.
8. \"supportingData\": a brief summary of the data points supporting the signal.

Focus only on the requested coin. Do not generate signals for other cryptocurrencies.
Ensure all price fields are numeric. Entry/target/stop spreads should reflect the trading \
term; long-term signals use wider price targets and stop losses than short-term signals.
Return an empty array if nothing is actionable. Output no prose outside the JSON array.";

#[derive(Debug, Serialize)]
struct EngineRequest {
    model: String,
    max_tokens: u32,
    system: String,
    messages: Vec<EngineMessage>,
}

#[derive(Debug, Serialize)]
struct EngineMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct EngineResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    text: Option<String>,
}

pub struct SignalEngineClient {
    client: reqwest::Client,
    config: SignalEngineConfig,
    rate_limiter: RateLimiter,
}

impl SignalEngineClient {
    pub fn new(config: SignalEngineConfig) -> Self {
        let rate_limiter = RateLimiter::new(config.requests_per_minute);
        Self {
            client: default_client(),
            config,
            rate_limiter,
        }
    }

    fn user_message(request: &SignalRequest) -> String {
        let mut message = format!(
            "Coin: {}\nTrading Term: {}\n\nAggregated Data for {}: {}\n",
            request.symbol, request.term, request.symbol, request.aggregated_data
        );

        if let Some(sentiment) = &request.social_sentiment {
            message.push_str(&format!("\nSocial Sentiment: {}\n", sentiment));
        }

        if let Some(customization) = &request.customization {
            message.push_str(&format!("\nCustomization Settings: {}\n", customization));
        }

        message
    }
}

#[async_trait]
impl SignalGenerator for SignalEngineClient {
    /// One attempt, no retries. Every signal in the response is shape
    /// validated before it is returned.
    async fn generate(&self, request: &SignalRequest) -> Result<Vec<TradingSignal>> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            return Err(AppError::SignalEngine("SIGNAL_API_KEY is not set".to_string()));
        };

        self.rate_limiter.acquire().await;

        let body = EngineRequest {
            model: self.config.model.clone(),
            max_tokens: self.config.max_tokens,
            system: SYSTEM_PROMPT.to_string(),
            messages: vec![EngineMessage {
                role: "user".to_string(),
                content: Self::user_message(request),
            }],
        };

        let url = format!("{}/v1/messages", self.config.base_url);
        let response = self
            .client
            .post(&url)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::SignalEngine(format!("Status {}: {}", status, text)));
        }

        let result: EngineResponse = response.json().await?;
        let text = result
            .content
            .iter()
            .filter(|block| block.content_type == "text")
            .filter_map(|block| block.text.as_deref())
            .collect::<Vec<_>>()
            .join("\n");

        let signals = extract_signals(&text)?;
        info!("Engine produced {} signals for {}", signals.len(), request.symbol);
        Ok(signals)
    }
}

/// Pulls the JSON array out of the response text (the engine may wrap it in
/// prose despite instructions) and validates every signal in it.
fn extract_signals(text: &str) -> Result<Vec<TradingSignal>> {
    let json = match (text.find('['), text.rfind(']')) {
        (Some(start), Some(end)) if end > start => &text[start..=end],
        _ => {
            return Err(AppError::SignalValidation(
                "no JSON array found in engine response".to_string(),
            ))
        }
    };

    let signals: Vec<TradingSignal> = serde_json::from_str(json)?;

    for signal in &signals {
        signal.validate().map_err(AppError::SignalValidation)?;
    }

    Ok(signals)
}
