mod chart;
mod coin;
mod quote;
mod signal;

pub use chart::{DisplayRange, OhlcPoint, TrendPoint};
pub use coin::{CatalogEntry, Coin, CoinList};
pub use quote::{format_price, MarketSnapshot, Quote};
pub use signal::{
    Sentiment, SignalReport, SignalRequest, SignalType, TradingSignal, TradingTerm,
};
