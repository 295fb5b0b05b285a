use augur::api::{MarketDataClient, SignalEngineClient};
use augur::catalog::CoinCatalog;
use augur::chart::{compute_display_range, dedup_signal_levels, synthesize_ohlc, synthesize_trend};
use augur::config::Settings;
use augur::models::{format_price, Coin, DisplayRange, TradingSignal, TradingTerm};
use augur::orchestrator::SignalOrchestrator;

use std::str::FromStr;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("augur=info".parse().unwrap()),
        )
        .init();

    info!("Augur starting - AI futures signal pipeline");

    // Load configuration
    let settings = Settings::load()?;
    info!("Configuration loaded successfully");

    // Request parameters: symbol, term, optional customization
    let args: Vec<String> = std::env::args().collect();
    let symbol = args
        .get(1)
        .cloned()
        .unwrap_or_else(|| settings.request.default_symbol.clone())
        .to_uppercase();
    let term_raw = args
        .get(2)
        .cloned()
        .unwrap_or_else(|| settings.request.default_term.clone());
    let term = TradingTerm::from_str(&term_raw).map_err(anyhow::Error::msg)?;
    let customization = args.get(3).map(String::as_str);

    // Coin catalog (the selector universe)
    let catalog = CoinCatalog::new(MarketDataClient::new(settings.market_data.clone()));
    let coin_list = catalog.list_coins().await;
    if let Some(e) = &coin_list.error {
        warn!("Coin catalog unavailable: {}", e);
    }
    info!("Catalog offers {} coins", coin_list.coins.len());

    let fallback = Coin::fallback();
    let coin_name = coin_list
        .coins
        .iter()
        .find(|c| c.symbol == symbol)
        .map(|c| c.name.clone())
        .unwrap_or_else(|| {
            if symbol == fallback.symbol {
                fallback.name.clone()
            } else {
                symbol.clone()
            }
        });

    // Run one orchestrated request
    let orchestrator = SignalOrchestrator::new(
        MarketDataClient::new(settings.market_data.clone()),
        SignalEngineClient::new(settings.signal_engine.clone()),
    );

    info!("Requesting {} signals for {} ({})", term, coin_name, symbol);
    let report = orchestrator
        .generate_signals(&symbol, &coin_name, term, customization)
        .await;

    if let Some(e) = &report.error {
        error!("Signal generation failed: {}", e);
    }

    let signals = report.signals.clone().unwrap_or_default();
    if !signals.is_empty() {
        print_signals(&symbol, term, &signals);
    } else if report.error.is_none() {
        info!("No actionable signals for {} right now", symbol);
    }

    // Chart synthesis anchored to the live price (placeholder when degraded)
    let current_price = report.latest_prices.get(&symbol).copied().flatten();
    match current_price {
        Some(price) => info!("Current {} price: ${}", symbol, format_price(price)),
        None => warn!("No live price for {}; chart uses synthetic baseline", symbol),
    }

    let mut rng = rand::rng();
    let trend = synthesize_trend(&mut rng, current_price, &symbol);
    let ohlc = synthesize_ohlc(&mut rng, current_price, &symbol);
    let range = compute_display_range(&trend, &ohlc, &signals, current_price);

    println!(
        "\nChart: {} trend points, {} OHLC bars for {}",
        trend.len(),
        ohlc.len(),
        symbol
    );
    match range {
        DisplayRange::Fixed { min, max } => {
            println!("Axis bounds: ${} - ${}", format_price(min), format_price(max))
        }
        DisplayRange::Auto => println!("Axis bounds: auto"),
    }

    Ok(())
}

fn print_signals(symbol: &str, term: TradingTerm, signals: &[TradingSignal]) {
    println!("\n========== {} {} FUTURES SIGNALS ==========", symbol, term);
    println!(
        "{:<6} {:<9} {:>6} {:>14} {:>14} {:>14}  {}",
        "Type", "Bias", "Conf", "Entry", "Target", "Stop", "Reason"
    );
    println!("{}", "-".repeat(100));

    for signal in dedup_signal_levels(signals) {
        let reason: String = signal.reason.chars().take(40).collect();
        println!(
            "{:<6} {:<9} {:>5.0}% {:>14} {:>14} {:>14}  {}",
            signal.signal_type.as_str(),
            signal.sentiment.as_str(),
            signal.confidence_level * 100.0,
            format_price(signal.entry_price),
            format_price(signal.target_price),
            format_price(signal.stop_loss_price),
            reason
        );
    }

    println!("=============================================\n");
}
