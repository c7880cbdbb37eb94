//! Supertrend: an ATR band around the bar midpoint that ratchets toward
//! price and flips direction on a confirmed breakout.
//!
//! # Recurrence
//!
//! For each bar with `mid = (high + low) / 2` and factor `k`:
//!
//! ```text
//! candidate_upper = mid + k * atr
//! candidate_lower = mid - k * atr
//!
//! upper = candidate_upper  if candidate_upper < upper[i-1] or close[i-1] > upper[i-1]
//!         upper[i-1]       otherwise
//! lower = candidate_lower  if candidate_lower > lower[i-1] or close[i-1] < lower[i-1]
//!         lower[i-1]       otherwise
//!
//! Downtrend -> Uptrend    iff close[i] > upper[i-1]
//! Uptrend   -> Downtrend  iff close[i] < lower[i-1]
//!
//! trend line = lower while Uptrend, upper while Downtrend
//! ```
//!
//! The ratchet looks at the *previous* close; the flip test compares the
//! *current* close with the *previous* band.
//!
//! # Warmup
//!
//! Until the ATR has `period` true ranges, ATR and both bands are NaN,
//! the direction stays at its initial `Downtrend`, and no flip is reported.
//! The first defined candidate band seeds the ratchet; earlier steps are
//! never backfilled.

use crate::smoothing::Smoothing;
use crate::volatility::StreamingAtr;
use serde::{Deserialize, Serialize};
use supertrend_core::error::IndicatorError;
use supertrend_core::traits::{BarIndicator, StreamingIndicator};
use supertrend_core::types::{Bar, Direction};
use tracing::trace;

/// Supertrend parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SupertrendParams {
    /// ATR lookback period
    pub atr_period: usize,
    /// Band multiplier applied to ATR
    pub factor: f64,
    /// ATR smoothing convention
    #[serde(default)]
    pub smoothing: Smoothing,
}

impl SupertrendParams {
    /// Parameters with Wilder smoothing.
    pub fn new(atr_period: usize, factor: f64) -> Self {
        Self {
            atr_period,
            factor,
            smoothing: Smoothing::Wilder,
        }
    }

    pub fn with_smoothing(mut self, smoothing: Smoothing) -> Self {
        self.smoothing = smoothing;
        self
    }

    pub fn validate(&self) -> Result<(), IndicatorError> {
        IndicatorError::check_period("Supertrend ATR", self.atr_period)?;
        IndicatorError::check_factor("Supertrend", self.factor)
    }
}

impl Default for SupertrendParams {
    fn default() -> Self {
        Self::new(10, 3.0)
    }
}

/// Band state after one step.
///
/// A plain value: `advance` consumes the previous state and returns the next
/// one, so independent instances never share anything.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandState {
    /// Final (ratcheted) upper band
    pub upper: f64,
    /// Final (ratcheted) lower band
    pub lower: f64,
    /// Trend line value
    pub value: f64,
    pub direction: Direction,
    /// Close of the bar that produced this state
    pub close: f64,
}

impl BandState {
    /// State for the very first bar.
    pub fn seed(bar: &Bar, atr: f64, factor: f64) -> Self {
        let (upper, lower) = candidate_bands(bar, atr, factor);
        Self {
            upper,
            lower,
            value: upper,
            direction: Direction::Downtrend,
            close: bar.close,
        }
    }

    /// State for the next bar.
    pub fn advance(self, bar: &Bar, atr: f64, factor: f64) -> Self {
        let (candidate_upper, candidate_lower) = candidate_bands(bar, atr, factor);

        let upper = ratchet(candidate_upper, self.upper, || {
            candidate_upper < self.upper || self.close > self.upper
        });
        let lower = ratchet(candidate_lower, self.lower, || {
            candidate_lower > self.lower || self.close < self.lower
        });

        // NaN bands compare false, so direction is sticky during warmup.
        let direction = match self.direction {
            Direction::Downtrend if bar.close > self.upper => Direction::Uptrend,
            Direction::Uptrend if bar.close < self.lower => Direction::Downtrend,
            unchanged => unchanged,
        };

        let value = match direction {
            Direction::Uptrend => lower,
            Direction::Downtrend => upper,
        };

        Self {
            upper,
            lower,
            value,
            direction,
            close: bar.close,
        }
    }

    /// Whether both bands are defined.
    pub fn is_defined(&self) -> bool {
        !self.upper.is_nan() && !self.lower.is_nan()
    }
}

#[inline]
fn candidate_bands(bar: &Bar, atr: f64, factor: f64) -> (f64, f64) {
    let mid = bar.midpoint();
    (mid + factor * atr, mid - factor * atr)
}

#[inline]
fn ratchet(candidate: f64, previous: f64, reset: impl FnOnce() -> bool) -> f64 {
    if candidate.is_nan() {
        f64::NAN
    } else if previous.is_nan() || reset() {
        candidate
    } else {
        previous
    }
}

/// Output of one Supertrend step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SupertrendOutput {
    /// Trend line value (NaN during warmup)
    pub value: f64,
    pub direction: Direction,
    pub upper: f64,
    pub lower: f64,
    /// True range of this bar
    pub true_range: f64,
    pub atr: f64,
    /// Direction changed on this bar
    pub flipped: bool,
}

impl SupertrendOutput {
    /// Whether the trend line has a value.
    pub fn is_defined(&self) -> bool {
        !self.value.is_nan()
    }
}

/// Streaming Supertrend engine.
///
/// Owns its ATR smoother and band state. Feed bars in time order with
/// [`Supertrend::update`]; ordering is trusted, not checked.
#[derive(Debug)]
pub struct Supertrend {
    params: SupertrendParams,
    atr: StreamingAtr,
    state: Option<BandState>,
    bars_seen: usize,
}

impl Supertrend {
    /// Create a new engine, rejecting invalid parameters.
    pub fn new(params: SupertrendParams) -> Result<Self, IndicatorError> {
        params.validate()?;
        Ok(Self {
            atr: StreamingAtr::new(params.atr_period, params.smoothing)?,
            params,
            state: None,
            bars_seen: 0,
        })
    }

    /// Process the next bar.
    pub fn update(&mut self, bar: &Bar) -> SupertrendOutput {
        let atr = self.atr.update(*bar).unwrap_or(f64::NAN);
        let factor = self.params.factor;

        let previous = self.state;
        let next = match previous {
            Some(state) => state.advance(bar, atr, factor),
            None => BandState::seed(bar, atr, factor),
        };
        self.state = Some(next);
        self.bars_seen += 1;

        let flipped = previous.is_some_and(|p| p.direction != next.direction);
        if flipped {
            trace!(
                period = self.params.atr_period,
                factor,
                direction = %next.direction,
                close = bar.close,
                "supertrend flip"
            );
        }

        SupertrendOutput {
            value: next.value,
            direction: next.direction,
            upper: next.upper,
            lower: next.lower,
            true_range: self.atr.last_true_range(),
            atr,
            flipped,
        }
    }

    /// Current band state, if any bar has been processed.
    pub fn state(&self) -> Option<BandState> {
        self.state
    }

    /// Current direction (Downtrend before the first bar).
    pub fn direction(&self) -> Direction {
        self.state.map(|s| s.direction).unwrap_or_default()
    }

    /// Whether the trend line currently has a value.
    pub fn is_ready(&self) -> bool {
        self.state.is_some_and(|s| !s.value.is_nan())
    }

    pub fn bars_seen(&self) -> usize {
        self.bars_seen
    }

    pub fn params(&self) -> SupertrendParams {
        self.params
    }

    /// Forget all history.
    pub fn reset(&mut self) {
        self.atr.reset();
        self.state = None;
        self.bars_seen = 0;
    }
}

impl BarIndicator for Supertrend {
    type Output = SupertrendOutput;

    /// Replay `bars` through a fresh engine with the same parameters.
    /// Does not touch this engine's state.
    fn calculate_bars(&self, bars: &[Bar]) -> Vec<SupertrendOutput> {
        let mut engine = Supertrend {
            params: self.params,
            atr: match StreamingAtr::new(self.params.atr_period, self.params.smoothing) {
                Ok(atr) => atr,
                // Parameters were validated when `self` was built.
                Err(_) => return Vec::new(),
            },
            state: None,
            bars_seen: 0,
        };
        bars.iter().map(|bar| engine.update(bar)).collect()
    }

    fn warmup(&self) -> usize {
        self.params.atr_period
    }

    fn name(&self) -> &str {
        "Supertrend"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(period: usize, factor: f64) -> Supertrend {
        Supertrend::new(SupertrendParams::new(period, factor)).unwrap()
    }

    #[test]
    fn test_rejects_invalid_params() {
        assert!(Supertrend::new(SupertrendParams::new(0, 3.0)).is_err());
        assert!(Supertrend::new(SupertrendParams::new(10, 0.0)).is_err());
        assert!(Supertrend::new(SupertrendParams::new(10, -2.0)).is_err());
        assert!(Supertrend::new(SupertrendParams::new(10, f64::INFINITY)).is_err());
    }

    #[test]
    fn test_seed_state() {
        let bar = Bar::from_hlc(0, 10.0, 8.0, 9.0);
        let state = BandState::seed(&bar, 2.0, 1.5);

        assert!((state.upper - 12.0).abs() < 1e-12);
        assert!((state.lower - 6.0).abs() < 1e-12);
        assert_eq!(state.value.to_bits(), state.upper.to_bits());
        assert_eq!(state.direction, Direction::Downtrend);
    }

    #[test]
    fn test_ratchet_uses_previous_close() {
        // Previous close sits above the previous upper band, so the upper
        // band resets to the (higher) candidate even though it rose.
        let prev = BandState {
            upper: 10.0,
            lower: 6.0,
            value: 10.0,
            direction: Direction::Downtrend,
            close: 10.5,
        };
        let bar = Bar::from_hlc(1, 12.0, 10.0, 9.0);
        let next = prev.advance(&bar, 1.0, 1.0);
        assert!((next.upper - 12.0).abs() < 1e-12);

        // Same bar, but the previous close was below the band: hold.
        let held = BandState { close: 9.5, ..prev }.advance(&bar, 1.0, 1.0);
        assert!((held.upper - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_flip_uses_current_close_against_previous_band() {
        let prev = BandState {
            upper: 10.0,
            lower: 6.0,
            value: 10.0,
            direction: Direction::Downtrend,
            close: 9.0,
        };

        // Candidate upper 12 would be held at 10; close 10.5 breaks the old band.
        let up = prev.advance(&Bar::from_hlc(1, 12.0, 10.0, 10.5), 1.0, 1.0);
        assert_eq!(up.direction, Direction::Uptrend);
        assert_eq!(up.value.to_bits(), up.lower.to_bits());

        // Close exactly on the band is not a breakout.
        let flat = prev.advance(&Bar::from_hlc(1, 12.0, 10.0, 10.0), 1.0, 1.0);
        assert_eq!(flat.direction, Direction::Downtrend);
    }

    #[test]
    fn test_nan_atr_keeps_direction() {
        let prev = BandState {
            upper: 10.0,
            lower: 6.0,
            value: 6.0,
            direction: Direction::Uptrend,
            close: 9.0,
        };
        let next = prev.advance(&Bar::from_hlc(1, 9.0, 8.0, 8.5), f64::NAN, 1.0);

        assert!(next.upper.is_nan());
        assert!(next.lower.is_nan());
        assert_eq!(next.direction, Direction::Uptrend);
    }

    #[test]
    fn test_warmup_is_nan_without_flips() {
        let mut st = engine(5, 2.0);
        for i in 0..4 {
            let price = 100.0 + i as f64 * 10.0;
            let out = st.update(&Bar::from_hlc(i, price + 1.0, price - 1.0, price));
            assert!(out.atr.is_nan());
            assert!(out.upper.is_nan());
            assert!(out.lower.is_nan());
            assert!(!out.is_defined());
            assert!(!out.flipped);
            assert_eq!(out.direction, Direction::Downtrend);
        }
        assert!(!st.is_ready());

        let out = st.update(&Bar::from_hlc(4, 141.0, 139.0, 140.0));
        assert!(out.is_defined());
        assert!(!out.flipped);
        assert!(st.is_ready());
    }

    #[test]
    fn test_reset_replays_identically() {
        let bars: Vec<Bar> = (0..60)
            .map(|i| {
                let p = 50.0 + (i as f64 * 0.3).sin() * 8.0;
                Bar::from_hlc(i, p + 1.2, p - 0.8, p + 0.1)
            })
            .collect();

        let mut st = engine(7, 2.0);
        let first: Vec<_> = bars.iter().map(|b| st.update(b)).collect();
        st.reset();
        assert_eq!(st.bars_seen(), 0);
        let second: Vec<_> = bars.iter().map(|b| st.update(b)).collect();

        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.value.to_bits(), b.value.to_bits());
            assert_eq!(a.direction, b.direction);
        }
    }

    #[test]
    fn test_calculate_bars_does_not_touch_state() {
        let st = engine(2, 1.0);
        let bars = [
            Bar::from_hlc(0, 10.0, 8.0, 9.0),
            Bar::from_hlc(1, 11.0, 9.0, 10.5),
        ];
        let out = st.calculate_bars(&bars);

        assert_eq!(out.len(), 2);
        assert!(out[1].is_defined());
        assert!(st.state().is_none());
        assert_eq!(st.bars_seen(), 0);
        assert_eq!(st.warmup(), 2);
    }

    #[test]
    fn test_output_serializes() {
        let mut st = engine(1, 1.0);
        let out = st.update(&Bar::from_hlc(0, 10.0, 8.0, 9.0));
        let json = serde_json::to_value(out).unwrap();

        assert_eq!(json["direction"], "downtrend");
        assert_eq!(json["flipped"], false);
    }
}
