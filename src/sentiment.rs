use rand::Rng;

/// Simulated news/social feed. Stands in for live news, RSS, or social
/// APIs; a real feed can replace it without touching the orchestrator.
const SENTIMENT_ITEMS: &[(&str, &str)] = &[
    (
        "Bullish",
        "Positive regulatory news from the US; SEC rumored to be approving a spot {name} ETF.",
    ),
    (
        "Bullish",
        "Major tech partnership announced for the {name} blockchain, boosting adoption potential.",
    ),
    (
        "Bullish",
        "{name} is trending on X (Twitter) after a shoutout from a major tech influencer.",
    ),
    (
        "Bearish",
        "Concerns are growing about network congestion and high transaction fees on the {name} network.",
    ),
    (
        "Bearish",
        "A competing blockchain just launched a 'vampire attack', trying to lure {name}'s developers and users.",
    ),
    (
        "Bearish",
        "A large, early investor wallet has been moving a significant amount of {symbol} to exchanges, signaling a potential sell-off.",
    ),
    (
        "Neutral",
        "The market is quiet for {name}, with trading volumes lower than average as investors await key inflation data later this week.",
    ),
];

/// One sentiment narrative for the signal request, picked at random per
/// invocation.
pub fn simulated_sentiment(rng: &mut impl Rng, symbol: &str, name: &str) -> String {
    let (kind, template) = SENTIMENT_ITEMS[rng.random_range(0..SENTIMENT_ITEMS.len())];
    let text = template.replace("{name}", name).replace("{symbol}", symbol);
    format!("Current Sentiment: {}. Key points: {}", kind, text)
}
