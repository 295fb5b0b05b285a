use crate::models::{OhlcPoint, TrendPoint};

use chrono::{Duration, NaiveDate, Utc};
use rand::Rng;

/// Baseline (price, volatility) per symbol for the trend walk; first match
/// wins, unknown symbols fall back to the default scale.
pub const TREND_SCALES: &[(&str, f64, f64)] = &[
    ("BTC", 50000.0, 8000.0),
    ("ETH", 3000.0, 500.0),
    ("SOL", 150.0, 30.0),
];
pub const DEFAULT_TREND_SCALE: (f64, f64) = (100.0, 20.0);

/// Baseline (price, fluctuation) per symbol for OHLC bars.
pub const OHLC_SCALES: &[(&str, f64, f64)] = &[
    ("BTC", 60000.0, 2000.0),
    ("ETH", 3000.0, 100.0),
    ("SOL", 150.0, 10.0),
];
pub const DEFAULT_OHLC_SCALE: (f64, f64) = (100.0, 20.0);

pub const TREND_POINTS: usize = 30;
pub const OHLC_BARS: usize = 5;
pub const MOVING_AVERAGE_WINDOW: usize = 10;

/// Floor for synthetic prices; keeps log-style displays away from zero.
const PRICE_EPSILON: f64 = 1e-6;

fn lookup(table: &[(&str, f64, f64)], default: (f64, f64), symbol: &str) -> (f64, f64) {
    table
        .iter()
        .find(|(s, _, _)| *s == symbol)
        .map(|(_, base, spread)| (*base, *spread))
        .unwrap_or(default)
}

/// A live price takes precedence over the symbol table: low prices scale
/// proportionally so sub-$1 assets cannot walk negative, and a zero price
/// gets a tiny fixed scale.
fn trend_scale(symbol: &str, current_price: Option<f64>) -> (f64, f64) {
    match current_price {
        Some(p) if p > 0.0 && p < 500.0 => (p * 0.8, p * 0.2),
        Some(p) if p == 0.0 => (10.0, 2.0),
        _ => lookup(TREND_SCALES, DEFAULT_TREND_SCALE, symbol),
    }
}

fn ohlc_scale(symbol: &str, current_price: Option<f64>) -> (f64, f64) {
    match current_price {
        Some(p) if p > 0.0 && p < 500.0 => (p, p * 0.1),
        Some(p) if p == 0.0 => (10.0, 1.0),
        _ => lookup(OHLC_SCALES, DEFAULT_OHLC_SCALE, symbol),
    }
}

fn day_label(today: NaiveDate, days_back: usize) -> String {
    (today - Duration::days(days_back as i64))
        .format("%m-%d")
        .to_string()
}

fn synth_volume(rng: &mut impl Rng, base: f64) -> f64 {
    let mut volume = base * 1000.0 * (0.5 + rng.random::<f64>());
    if rng.random_bool(0.05) {
        volume *= 3.0;
    }
    volume
}

/// Daily price-trend series. A random walk from a baseline start, with the
/// last point forced to the real current price when one is supplied so the
/// chart reconciles with the reported live price.
pub fn synthesize_trend(
    rng: &mut impl Rng,
    current_price: Option<f64>,
    symbol: &str,
) -> Vec<TrendPoint> {
    let (base, volatility) = trend_scale(symbol, current_price);

    let mut price = match current_price {
        Some(p) => p - (rng.random::<f64>() * (base * 0.1) - base * 0.05) * 5.0,
        None => base + rng.random::<f64>() * (base * 0.2) - base * 0.1,
    };
    price = price.max(PRICE_EPSILON);

    let today = Utc::now().date_naive();
    let mut points = Vec::with_capacity(TREND_POINTS);

    for i in 0..TREND_POINTS - 1 {
        let change = rng.random::<f64>() * volatility - volatility / 2.0;
        price = (price + change).max(PRICE_EPSILON);
        points.push(TrendPoint {
            label: day_label(today, TREND_POINTS - 1 - i),
            price,
            volume: synth_volume(rng, base),
            moving_average: None,
        });
    }

    let last = match current_price {
        Some(p) => p,
        None => {
            let change = rng.random::<f64>() * volatility - volatility / 2.0;
            (price + change).max(PRICE_EPSILON)
        }
    };
    points.push(TrendPoint {
        label: day_label(today, 0),
        price: last,
        volume: synth_volume(rng, base),
        moving_average: None,
    });

    apply_moving_average(&mut points, MOVING_AVERAGE_WINDOW);
    points
}

/// Trailing average over the price series; points before the window has
/// filled stay `None`.
fn apply_moving_average(points: &mut [TrendPoint], window: usize) {
    for i in (window.saturating_sub(1))..points.len() {
        let sum: f64 = points[i + 1 - window..=i].iter().map(|p| p.price).sum();
        points[i].moving_average = Some(sum / window as f64);
    }
}

/// Daily OHLC bars. Each bar opens at the prior close; the final bar closes
/// at the real current price when one is supplied, with its high/low widened
/// to include it.
pub fn synthesize_ohlc(
    rng: &mut impl Rng,
    current_price: Option<f64>,
    symbol: &str,
) -> Vec<OhlcPoint> {
    let (base, fluctuation) = ohlc_scale(symbol, current_price);

    let mut last_close = match current_price {
        Some(p) => p * (1.0 - (rng.random::<f64>() * 0.1 - 0.05)),
        None => base + rng.random::<f64>() * (base * 0.1) - base * 0.05,
    };
    last_close = last_close.max(PRICE_EPSILON);

    let today = Utc::now().date_naive();
    let mut bars = Vec::with_capacity(OHLC_BARS);

    for i in 0..OHLC_BARS - 1 {
        let open = last_close;
        let high = open + rng.random::<f64>() * fluctuation;
        let low = (open - rng.random::<f64>() * fluctuation).max(PRICE_EPSILON);
        let close = low + rng.random::<f64>() * (high - low);
        last_close = close;

        bars.push(OhlcPoint {
            label: day_label(today, OHLC_BARS - 1 - i),
            open,
            high,
            low,
            close,
            volume: synth_volume(rng, base),
        });
    }

    let open = last_close;
    let final_bar = match current_price {
        Some(p) => {
            let high = open.max(p).max(open + rng.random::<f64>() * fluctuation * 0.5);
            let low = open
                .min(p)
                .min(open - rng.random::<f64>() * fluctuation * 0.5)
                .max(PRICE_EPSILON);
            OhlcPoint {
                label: day_label(today, 0),
                open,
                high,
                low,
                close: p,
                volume: synth_volume(rng, base),
            }
        }
        None => {
            let high = open + rng.random::<f64>() * fluctuation;
            let low = (open - rng.random::<f64>() * fluctuation).max(PRICE_EPSILON);
            let close = low + rng.random::<f64>() * (high - low);
            OhlcPoint {
                label: day_label(today, 0),
                open,
                high,
                low,
                close,
                volume: synth_volume(rng, base),
            }
        }
    };
    bars.push(final_bar);
    bars
}
