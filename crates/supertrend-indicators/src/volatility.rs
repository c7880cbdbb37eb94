//! Volatility indicators.

use crate::simd::true_range_simd;
use crate::smoothing::Smoothing;
use supertrend_core::error::IndicatorError;
use supertrend_core::traits::{BarIndicator, BoxedSmoother, StreamingIndicator};
use supertrend_core::types::Bar;

/// True range of `bar` given the previous close, if any.
#[inline]
pub fn true_range(bar: &Bar, prev_close: Option<f64>) -> f64 {
    bar.true_range(prev_close)
}

/// True range for every bar; the first bar uses `high - low`.
pub fn true_range_series(bars: &[Bar]) -> Vec<f64> {
    let mut prev_close = None;
    bars.iter()
        .map(|bar| {
            let tr = true_range(bar, prev_close);
            prev_close = Some(bar.close);
            tr
        })
        .collect()
}

/// Average True Range (ATR).
///
/// Smooths the true-range series with the chosen convention. Wilder is the
/// reference convention for this indicator family; Simple exists for parity
/// with tools that use a plain average.
#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
    smoothing: Smoothing,
}

impl Atr {
    /// Create a new ATR indicator.
    pub fn new(period: usize, smoothing: Smoothing) -> Result<Self, IndicatorError> {
        IndicatorError::check_period("ATR", period)?;
        Ok(Self { period, smoothing })
    }

    pub fn smoothing(&self) -> Smoothing {
        self.smoothing
    }

    /// Calculate ATR from parallel high/low/close columns.
    pub fn calculate_ohlc(&self, high: &[f64], low: &[f64], close: &[f64]) -> Vec<f64> {
        let tr = true_range_simd(high, low, close);
        self.smoothing.apply(&tr, self.period)
    }
}

impl BarIndicator for Atr {
    type Output = f64;

    fn calculate_bars(&self, bars: &[Bar]) -> Vec<f64> {
        self.smoothing.apply(&true_range_series(bars), self.period)
    }

    fn warmup(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "ATR"
    }
}

/// Streaming ATR fed one bar at a time.
pub struct StreamingAtr {
    smoother: BoxedSmoother,
    smoothing: Smoothing,
    prev_close: Option<f64>,
    last_true_range: f64,
}

impl StreamingAtr {
    /// Create a new streaming ATR.
    pub fn new(period: usize, smoothing: Smoothing) -> Result<Self, IndicatorError> {
        IndicatorError::check_period("ATR", period)?;
        Ok(Self {
            smoother: smoothing.smoother(period)?,
            smoothing,
            prev_close: None,
            last_true_range: f64::NAN,
        })
    }

    /// True range of the most recent bar (NaN before the first bar).
    pub fn last_true_range(&self) -> f64 {
        self.last_true_range
    }

    pub fn smoothing(&self) -> Smoothing {
        self.smoothing
    }
}

impl StreamingIndicator for StreamingAtr {
    type Input = Bar;
    type Output = f64;

    fn update(&mut self, bar: Bar) -> Option<f64> {
        let tr = true_range(&bar, self.prev_close);
        self.prev_close = Some(bar.close);
        self.last_true_range = tr;
        self.smoother.update(tr)
    }

    fn current(&self) -> Option<f64> {
        self.smoother.current()
    }

    fn reset(&mut self) {
        self.smoother.reset();
        self.prev_close = None;
        self.last_true_range = f64::NAN;
    }

    fn is_ready(&self) -> bool {
        self.smoother.is_ready()
    }

    fn period(&self) -> usize {
        self.smoother.period()
    }

    fn name(&self) -> &str {
        "ATR"
    }
}

impl std::fmt::Debug for StreamingAtr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamingAtr")
            .field("period", &self.smoother.period())
            .field("smoothing", &self.smoothing)
            .field("current", &self.smoother.current())
            .finish()
    }
}
