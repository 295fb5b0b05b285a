use std::collections::HashMap;

/// Point-in-time market snapshot for one symbol. `as_of` is the provider's
/// fetch timestamp, shared by every quote in the same batch.
#[derive(Debug, Clone)]
pub struct Quote {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub volume_24h: f64,
    pub percent_change_24h: f64,
    pub market_cap: f64,
    pub as_of: String,
}

impl Quote {
    /// One sentence of the aggregated summary handed to the signal engine.
    pub fn summary_line(&self) -> String {
        format!(
            "Current {} ({}) price is ${} (24h change: {:.2}%). Volume (24h): ${:.0}. Market Cap: ${:.0}. ",
            self.name,
            self.symbol,
            format_price(self.price),
            self.percent_change_24h,
            self.volume_24h,
            self.market_cap
        )
    }
}

/// Result of one quote fetch: a natural-language summary for the signal
/// engine plus the latest price per requested symbol. The price map always
/// carries every requested symbol; `None` marks a symbol the provider had
/// no data for.
#[derive(Debug, Clone)]
pub struct MarketSnapshot {
    pub summary: String,
    pub prices: HashMap<String, Option<f64>>,
}

/// Sub-$1 assets get six fractional digits so they do not round to zero.
pub fn format_price(price: f64) -> String {
    if price < 1.0 {
        format!("{:.6}", price)
    } else {
        format!("{:.2}", price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price_precision() {
        assert_eq!(format_price(45000.0), "45000.00");
        assert_eq!(format_price(1.0), "1.00");
        assert_eq!(format_price(0.000123), "0.000123");
    }

    #[test]
    fn test_summary_line_mentions_symbol_and_name() {
        let quote = Quote {
            symbol: "BTC".to_string(),
            name: "Bitcoin".to_string(),
            price: 64250.5,
            volume_24h: 38_000_000_000.0,
            percent_change_24h: -1.25,
            market_cap: 1_260_000_000_000.0,
            as_of: "2026-08-25 10:00:00 UTC".to_string(),
        };

        let line = quote.summary_line();
        assert!(line.contains("Bitcoin (BTC)"));
        assert!(line.contains("$64250.50"));
        assert!(line.contains("-1.25%"));
    }
}
