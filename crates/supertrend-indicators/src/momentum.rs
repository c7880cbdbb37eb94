//! Momentum indicators.

use crate::smoothing::StreamingSma;
use supertrend_core::error::IndicatorError;
use supertrend_core::traits::StreamingIndicator;

/// Relative Strength Index over simple averages of gains and losses.
///
/// Ready once `period` price changes have been seen, i.e. after
/// `period + 1` closes.
#[derive(Debug, Clone)]
pub struct StreamingRsi {
    gains: StreamingSma,
    losses: StreamingSma,
    prev_close: Option<f64>,
    current: Option<f64>,
}

impl StreamingRsi {
    /// Create a new streaming RSI.
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        IndicatorError::check_period("RSI", period)?;
        Ok(Self {
            gains: StreamingSma::new(period)?,
            losses: StreamingSma::new(period)?,
            prev_close: None,
            current: None,
        })
    }

    fn value(gain: f64, loss: f64) -> f64 {
        if loss == 0.0 {
            if gain == 0.0 {
                50.0
            } else {
                100.0
            }
        } else {
            100.0 - 100.0 / (1.0 + gain / loss)
        }
    }
}

impl StreamingIndicator for StreamingRsi {
    type Input = f64;
    type Output = f64;

    fn update(&mut self, close: f64) -> Option<f64> {
        if let Some(prev) = self.prev_close.replace(close) {
            let change = close - prev;
            let gain = self.gains.update(change.max(0.0));
            let loss = self.losses.update((-change).max(0.0));
            self.current = gain.zip(loss).map(|(g, l)| Self::value(g, l));
        }
        self.current
    }

    fn current(&self) -> Option<f64> {
        self.current
    }

    fn reset(&mut self) {
        self.gains.reset();
        self.losses.reset();
        self.prev_close = None;
        self.current = None;
    }

    fn is_ready(&self) -> bool {
        self.current.is_some()
    }

    fn period(&self) -> usize {
        self.gains.period() + 1
    }

    fn name(&self) -> &str {
        "RSI"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(period: usize, closes: &[f64]) -> Vec<Option<f64>> {
        let mut rsi = StreamingRsi::new(period).unwrap();
        closes.iter().map(|&c| rsi.update(c)).collect()
    }

    #[test]
    fn test_rsi_warmup() {
        let out = run(3, &[1.0, 2.0, 3.0, 4.0]);

        assert!(out[..3].iter().all(Option::is_none));
        assert_eq!(out[3], Some(100.0));
    }

    #[test]
    fn test_rsi_all_losses() {
        let out = run(2, &[4.0, 3.0, 2.0]);
        assert_eq!(out[2], Some(0.0));
    }

    #[test]
    fn test_rsi_mixed() {
        // Gains (2, 0) and losses (0, 1): RS = 1 / 0.5
        let out = run(2, &[10.0, 12.0, 11.0]);
        let rsi = out[2].unwrap();
        assert!((rsi - 200.0 / 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_rsi_flat_prices() {
        let out = run(2, &[5.0, 5.0, 5.0]);
        assert_eq!(out[2], Some(50.0));
    }

    #[test]
    fn test_rsi_reset() {
        let mut rsi = StreamingRsi::new(2).unwrap();
        for close in [1.0, 2.0, 3.0] {
            rsi.update(close);
        }
        assert!(rsi.is_ready());

        rsi.reset();
        assert!(!rsi.is_ready());
        assert!(rsi.update(10.0).is_none());
    }

    #[test]
    fn test_rsi_rejects_zero_period() {
        assert!(StreamingRsi::new(0).is_err());
    }
}
