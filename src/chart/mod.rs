mod range;
mod synthesizer;

pub use range::{compute_display_range, dedup_signal_levels};
pub use synthesizer::{
    synthesize_ohlc, synthesize_trend, DEFAULT_OHLC_SCALE, DEFAULT_TREND_SCALE,
    MOVING_AVERAGE_WINDOW, OHLC_BARS, OHLC_SCALES, TREND_POINTS, TREND_SCALES,
};
