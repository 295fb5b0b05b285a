/// One point of the synthetic trend series. The moving average is absent
/// until its window has filled.
#[derive(Debug, Clone)]
pub struct TrendPoint {
    pub label: String,
    pub price: f64,
    pub volume: f64,
    pub moving_average: Option<f64>,
}

/// One synthetic OHLC bar. Invariant: low <= min(open, close) and
/// high >= max(open, close).
#[derive(Debug, Clone)]
pub struct OhlcPoint {
    pub label: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Vertical axis bounds for a price chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DisplayRange {
    /// Nothing plottable; the renderer picks its own bounds.
    Auto,
    Fixed { min: f64, max: f64 },
}
