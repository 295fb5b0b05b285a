use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalType {
    Buy,
    Sell,
}

impl SignalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalType::Buy => "BUY",
            SignalType::Sell => "SELL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Sentiment {
    Bullish,
    Bearish,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Bullish => "BULLISH",
            Sentiment::Bearish => "BEARISH",
        }
    }
}

/// Holding horizon for generated signals; scales suggested price spreads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradingTerm {
    ShortTerm,
    MediumTerm,
    LongTerm,
}

impl TradingTerm {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradingTerm::ShortTerm => "SHORT_TERM",
            TradingTerm::MediumTerm => "MEDIUM_TERM",
            TradingTerm::LongTerm => "LONG_TERM",
        }
    }
}

impl fmt::Display for TradingTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TradingTerm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SHORT" | "SHORT_TERM" => Ok(TradingTerm::ShortTerm),
            "MEDIUM" | "MEDIUM_TERM" => Ok(TradingTerm::MediumTerm),
            "LONG" | "LONG_TERM" => Ok(TradingTerm::LongTerm),
            other => Err(format!("Unknown trading term: {}", other)),
        }
    }
}

/// One generated futures signal. Produced only by the signal engine and
/// validated before being trusted; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradingSignal {
    pub signal_type: SignalType,
    pub sentiment: Sentiment,
    pub confidence_level: f64,
    pub entry_price: f64,
    pub target_price: f64,
    pub stop_loss_price: f64,
    pub reason: String,
    pub supporting_data: String,
}

impl TradingSignal {
    /// Overlay identity: reason and supporting data are presentation-only,
    /// so two signals with the same type and price levels are one overlay.
    pub fn level_key(&self) -> (SignalType, u64, u64, u64) {
        (
            self.signal_type,
            self.entry_price.to_bits(),
            self.target_price.to_bits(),
            self.stop_loss_price.to_bits(),
        )
    }

    /// Shape checks the engine's schema cannot express: confidence stays in
    /// [0, 1] and every price level is a finite number.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.confidence_level) {
            return Err(format!(
                "confidence level {} outside [0, 1]",
                self.confidence_level
            ));
        }

        for (field, value) in [
            ("entry price", self.entry_price),
            ("target price", self.target_price),
            ("stop loss price", self.stop_loss_price),
        ] {
            if !value.is_finite() {
                return Err(format!("{} is not a finite number", field));
            }
        }

        Ok(())
    }
}

/// Structured request handed to the signal engine.
#[derive(Debug, Clone)]
pub struct SignalRequest {
    pub symbol: String,
    pub term: TradingTerm,
    pub aggregated_data: String,
    pub social_sentiment: Option<String>,
    pub customization: Option<String>,
}

/// Single result shape for one orchestrated request. `signals: None` with an
/// error message means generation failed; `Some(vec![])` means the engine
/// legitimately found nothing actionable. Latest prices are populated either
/// way so the chart can still render.
#[derive(Debug, Clone)]
pub struct SignalReport {
    pub signals: Option<Vec<TradingSignal>>,
    pub error: Option<String>,
    pub latest_prices: HashMap<String, Option<f64>>,
    pub generation: u64,
}
