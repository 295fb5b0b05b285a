use crate::api::{QuoteSource, SignalGenerator};
use crate::models::{SignalReport, SignalRequest, TradingTerm};
use crate::sentiment;

use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{error, info};

/// Runs one signal request end to end: quotes, sentiment narrative, engine
/// call, validation. Generic over its two external seams so tests can swap
/// in doubles.
pub struct SignalOrchestrator<Q, G> {
    quotes: Q,
    engine: G,
    generation: AtomicU64,
}

impl<Q: QuoteSource, G: SignalGenerator> SignalOrchestrator<Q, G> {
    pub fn new(quotes: Q, engine: G) -> Self {
        Self {
            quotes,
            engine,
            generation: AtomicU64::new(0),
        }
    }

    /// One full pipeline pass. Every failure mode folds into the report;
    /// latest prices come straight from the quote source regardless of
    /// whether signal generation succeeded, so the chart can still render.
    pub async fn generate_signals(
        &self,
        symbol: &str,
        coin_name: &str,
        term: TradingTerm,
        customization: Option<&str>,
    ) -> SignalReport {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        info!("Request {}: {} signals for {}", generation, term, symbol);

        let snapshot = self.quotes.fetch_quotes(&[symbol.to_string()]).await;

        let social_sentiment = {
            let mut rng = rand::rng();
            sentiment::simulated_sentiment(&mut rng, symbol, coin_name)
        };

        let request = SignalRequest {
            symbol: symbol.to_string(),
            term,
            aggregated_data: snapshot.summary.clone(),
            social_sentiment: Some(social_sentiment),
            customization: customization.map(str::to_string),
        };

        match self.engine.generate(&request).await {
            Ok(signals) => {
                info!("Request {}: {} signals returned", generation, signals.len());
                SignalReport {
                    signals: Some(signals),
                    error: None,
                    latest_prices: snapshot.prices,
                    generation,
                }
            }
            Err(e) => {
                error!("Request {}: signal generation failed: {}", generation, e);
                SignalReport {
                    signals: None,
                    error: Some(e.to_string()),
                    latest_prices: snapshot.prices,
                    generation,
                }
            }
        }
    }

    /// True while no newer request has started. Callers drop stale reports
    /// on arrival; in-flight calls are never cancelled.
    pub fn is_current(&self, report: &SignalReport) -> bool {
        report.generation == self.generation.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{MarketDataClient, QuoteSource, SignalGenerator};
    use crate::config::MarketDataConfig;
    use crate::error::{AppError, Result};
    use crate::models::{MarketSnapshot, Sentiment, SignalType, TradingSignal};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct FixedQuotes {
        summary: String,
        price: f64,
    }

    #[async_trait]
    impl QuoteSource for FixedQuotes {
        async fn fetch_quotes(&self, symbols: &[String]) -> MarketSnapshot {
            let mut prices = HashMap::new();
            for symbol in symbols {
                prices.insert(symbol.clone(), Some(self.price));
            }
            MarketSnapshot {
                summary: self.summary.clone(),
                prices,
            }
        }
    }

    /// Engine double: `None` simulates a failure, otherwise returns the
    /// canned signals. Captures the last request for assertions.
    struct StubEngine {
        signals: Option<Vec<TradingSignal>>,
        last_request: Mutex<Option<SignalRequest>>,
    }

    impl StubEngine {
        fn ok(signals: Vec<TradingSignal>) -> Self {
            Self {
                signals: Some(signals),
                last_request: Mutex::new(None),
            }
        }

        fn failing() -> Self {
            Self {
                signals: None,
                last_request: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl SignalGenerator for StubEngine {
        async fn generate(&self, request: &SignalRequest) -> Result<Vec<TradingSignal>> {
            *self.last_request.lock().unwrap() = Some(request.clone());
            match &self.signals {
                Some(signals) => Ok(signals.clone()),
                None => Err(AppError::SignalEngine("engine unavailable".to_string())),
            }
        }
    }

    fn sample_signal() -> TradingSignal {
        TradingSignal {
            signal_type: SignalType::Buy,
            sentiment: Sentiment::Bullish,
            confidence_level: 0.72,
            entry_price: 64000.0,
            target_price: 66500.0,
            stop_loss_price: 63200.0,
            reason: "Support retest".to_string(),
            supporting_data: "Volume rising".to_string(),
        }
    }

    fn offline_market_data() -> MarketDataClient {
        MarketDataClient::new(MarketDataConfig {
            base_url: "http://127.0.0.1:0".to_string(),
            catalog_limit: 10,
            requests_per_minute: 60,
            api_key: None,
        })
    }

    #[tokio::test]
    async fn test_empty_signal_array_is_valid_not_error() {
        let orchestrator = SignalOrchestrator::new(
            FixedQuotes {
                summary: "Current Bitcoin (BTC) price is $64250.50.".to_string(),
                price: 64250.5,
            },
            StubEngine::ok(vec![]),
        );

        let report = orchestrator
            .generate_signals("BTC", "Bitcoin", TradingTerm::ShortTerm, None)
            .await;

        assert_eq!(report.signals, Some(vec![]));
        assert!(report.error.is_none());
        assert_eq!(report.latest_prices["BTC"], Some(64250.5));
    }

    #[tokio::test]
    async fn test_engine_failure_keeps_latest_prices() {
        let orchestrator = SignalOrchestrator::new(
            FixedQuotes {
                summary: "summary".to_string(),
                price: 150.0,
            },
            StubEngine::failing(),
        );

        let report = orchestrator
            .generate_signals("SOL", "Solana", TradingTerm::MediumTerm, None)
            .await;

        assert!(report.signals.is_none());
        assert!(report.error.as_deref().unwrap().contains("engine unavailable"));
        assert_eq!(report.latest_prices["SOL"], Some(150.0));
    }

    #[tokio::test]
    async fn test_unconfigured_provider_still_yields_placeholder_prices() {
        let orchestrator =
            SignalOrchestrator::new(offline_market_data(), StubEngine::ok(vec![sample_signal()]));

        let report = orchestrator
            .generate_signals("BTC", "Bitcoin", TradingTerm::ShortTerm, None)
            .await;

        assert!(report.error.is_none());
        assert_eq!(report.signals.as_ref().map(Vec::len), Some(1));
        assert_eq!(report.latest_prices["BTC"], Some(50000.0));
    }

    #[tokio::test]
    async fn test_provider_failure_degrades_to_placeholders_without_error() {
        // Key present but the endpoint is unreachable, so the quote call
        // itself fails and the gateway falls back to placeholders.
        let unreachable = MarketDataClient::new(MarketDataConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            catalog_limit: 10,
            requests_per_minute: 60,
            api_key: Some("test-key".to_string()),
        });
        let orchestrator = SignalOrchestrator::new(unreachable, StubEngine::ok(vec![]));

        let report = orchestrator
            .generate_signals("BTC", "Bitcoin", TradingTerm::ShortTerm, None)
            .await;

        assert!(report.error.is_none());
        assert_eq!(report.latest_prices["BTC"], Some(50000.0));

        let request = orchestrator
            .engine
            .last_request
            .lock()
            .unwrap()
            .clone()
            .unwrap();
        assert!(request.aggregated_data.contains("ERROR_NOTE"));
    }

    #[tokio::test]
    async fn test_request_carries_summary_sentiment_and_customization() {
        let engine = StubEngine::ok(vec![]);
        let orchestrator = SignalOrchestrator::new(
            FixedQuotes {
                summary: "Current Ethereum (ETH) price is $3050.10.".to_string(),
                price: 3050.1,
            },
            engine,
        );

        orchestrator
            .generate_signals("ETH", "Ethereum", TradingTerm::LongTerm, Some("3x leverage max"))
            .await;

        let request = orchestrator
            .engine
            .last_request
            .lock()
            .unwrap()
            .clone()
            .unwrap();
        assert_eq!(request.symbol, "ETH");
        assert_eq!(request.term, TradingTerm::LongTerm);
        assert!(request.aggregated_data.contains("$3050.10"));
        assert!(request
            .social_sentiment
            .as_deref()
            .unwrap()
            .starts_with("Current Sentiment: "));
        assert_eq!(request.customization.as_deref(), Some("3x leverage max"));
    }

    #[tokio::test]
    async fn test_newer_request_makes_older_report_stale() {
        let orchestrator = SignalOrchestrator::new(
            FixedQuotes {
                summary: "summary".to_string(),
                price: 1.0,
            },
            StubEngine::ok(vec![]),
        );

        let first = orchestrator
            .generate_signals("BTC", "Bitcoin", TradingTerm::ShortTerm, None)
            .await;
        assert!(orchestrator.is_current(&first));

        let second = orchestrator
            .generate_signals("ETH", "Ethereum", TradingTerm::ShortTerm, None)
            .await;

        assert!(!orchestrator.is_current(&first));
        assert!(orchestrator.is_current(&second));
    }
}
