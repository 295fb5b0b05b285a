use crate::models::{DisplayRange, OhlcPoint, TradingSignal, TrendPoint};

use std::collections::HashSet;

/// Signals sharing identical (type, entry, target, stop) collapse to one
/// overlay entry, so rendering the same set twice cannot double the
/// reference lines. Keeps first occurrences in order.
pub fn dedup_signal_levels(signals: &[TradingSignal]) -> Vec<&TradingSignal> {
    let mut seen = HashSet::new();
    signals
        .iter()
        .filter(|signal| seen.insert(signal.level_key()))
        .collect()
}

/// Axis bounds over everything plotted: trend prices and moving averages,
/// OHLC highs/lows, deduplicated signal levels, and the current price.
/// Flat data pads by 10% of the value (one unit when zero); otherwise both
/// ends pad by 15% of the range. The lower bound never goes below zero.
pub fn compute_display_range(
    trend: &[TrendPoint],
    ohlc: &[OhlcPoint],
    signals: &[TradingSignal],
    current_price: Option<f64>,
) -> DisplayRange {
    let mut values: Vec<f64> = Vec::new();
    values.extend(trend.iter().map(|p| p.price));
    values.extend(trend.iter().filter_map(|p| p.moving_average));
    for bar in ohlc {
        values.push(bar.high);
        values.push(bar.low);
    }
    for signal in dedup_signal_levels(signals) {
        values.push(signal.entry_price);
        values.push(signal.target_price);
        values.push(signal.stop_loss_price);
    }
    if let Some(price) = current_price {
        values.push(price);
    }
    values.retain(|v| v.is_finite());

    if values.is_empty() {
        return DisplayRange::Auto;
    }

    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    if min == max {
        let padding = if min == 0.0 { 1.0 } else { (min * 0.1).abs() };
        return DisplayRange::Fixed {
            min: (min - padding).max(0.0),
            max: max + padding,
        };
    }

    let padding = (max - min) * 0.15;
    DisplayRange::Fixed {
        min: (min - padding).max(0.0),
        max: max + padding,
    }
}
