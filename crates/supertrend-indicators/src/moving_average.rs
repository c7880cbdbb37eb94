//! Moving average indicators over close prices.

use crate::smoothing::{smooth_rma, smooth_sma};
use supertrend_core::error::IndicatorError;
use supertrend_core::traits::{Indicator, StreamingIndicator};

/// Simple Moving Average (SMA).
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
}

impl Sma {
    /// Create a new SMA with the specified period.
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        IndicatorError::check_period("SMA", period)?;
        Ok(Self { period })
    }
}

impl Indicator for Sma {
    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        smooth_sma(data, self.period)
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "SMA"
    }
}

/// Wilder's Moving Average (RMA, also called SMMA).
#[derive(Debug, Clone)]
pub struct Rma {
    period: usize,
}

impl Rma {
    /// Create a new RMA with the specified period.
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        IndicatorError::check_period("RMA", period)?;
        Ok(Self { period })
    }
}

impl Indicator for Rma {
    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        smooth_rma(data, self.period)
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "RMA"
    }
}

/// Exponential Moving Average (EMA).
///
/// Gives more weight to recent prices using `alpha = 2 / (period + 1)`,
/// seeded with the SMA of the first `period` values.
#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
}

impl Ema {
    /// Create a new EMA with the specified period.
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        IndicatorError::check_period("EMA", period)?;
        Ok(Self { period })
    }
}

impl Indicator for Ema {
    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        let mut ema = StreamingEma::with_period(self.period);
        data.iter()
            .map(|&v| ema.update(v).unwrap_or(f64::NAN))
            .collect()
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "EMA"
    }
}

/// Streaming EMA that maintains state for incremental updates.
#[derive(Debug, Clone)]
pub struct StreamingEma {
    period: usize,
    multiplier: f64,
    current: Option<f64>,
    count: usize,
    sum: f64,
}

impl StreamingEma {
    /// Create a new streaming EMA.
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        IndicatorError::check_period("EMA", period)?;
        Ok(Self::with_period(period))
    }

    fn with_period(period: usize) -> Self {
        Self {
            period,
            multiplier: 2.0 / (period as f64 + 1.0),
            current: None,
            count: 0,
            sum: 0.0,
        }
    }
}

impl StreamingIndicator for StreamingEma {
    type Input = f64;
    type Output = f64;

    fn update(&mut self, value: f64) -> Option<f64> {
        match self.current {
            Some(ema) => {
                self.current = Some(value * self.multiplier + ema * (1.0 - self.multiplier));
            }
            None => {
                // Accumulating for initial SMA
                self.count += 1;
                self.sum += value;
                if self.count == self.period {
                    self.current = Some(self.sum / self.period as f64);
                }
            }
        }
        self.current
    }

    fn current(&self) -> Option<f64> {
        self.current
    }

    fn reset(&mut self) {
        self.current = None;
        self.count = 0;
        self.sum = 0.0;
    }

    fn is_ready(&self) -> bool {
        self.current.is_some()
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "EMA"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sma() {
        let sma = Sma::new(3).unwrap();
        let result = sma.calculate(&[1.0, 2.0, 3.0, 4.0, 5.0]);

        assert_eq!(result.len(), 5);
        assert!(result[1].is_nan());
        assert!((result[2] - 2.0).abs() < 1e-10); // (1+2+3)/3
        assert!((result[4] - 4.0).abs() < 1e-10); // (3+4+5)/3
    }

    #[test]
    fn test_ema() {
        let ema = Ema::new(3).unwrap();
        let result = ema.calculate(&[1.0, 2.0, 3.0, 4.0, 5.0]);

        assert!(result[1].is_nan());
        assert!((result[2] - 2.0).abs() < 1e-10); // Initial SMA
        // mult = 2/(3+1) = 0.5; 4 * 0.5 + 2 * 0.5 = 3.0
        assert!((result[3] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_ema_reacts_faster_than_rma() {
        let mut data = vec![10.0; 10];
        data.push(20.0);

        let ema = Ema::new(9).unwrap().calculate(&data);
        let rma = Rma::new(9).unwrap().calculate(&data);

        let last = data.len() - 1;
        assert!(ema[last] > rma[last]);
        assert!(rma[last] > 10.0);
    }

    #[test]
    fn test_invalid_period() {
        assert!(Sma::new(0).is_err());
        assert!(Rma::new(0).is_err());
        assert!(Ema::new(0).is_err());
        assert!(StreamingEma::new(0).is_err());
    }

    #[test]
    fn test_streaming_ema() {
        let mut ema = StreamingEma::new(3).unwrap();

        assert!(!ema.is_ready());
        assert!(ema.update(1.0).is_none());
        assert!(ema.update(2.0).is_none());

        let first = ema.update(3.0).unwrap();
        assert!((first - 2.0).abs() < 1e-10);
        assert!(ema.is_ready());

        let second = ema.update(4.0).unwrap();
        assert!((second - 3.0).abs() < 1e-10);

        ema.reset();
        assert!(!ema.is_ready());
        assert!(ema.current().is_none());
    }
}
