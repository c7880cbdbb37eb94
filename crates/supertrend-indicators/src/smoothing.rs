//! Smoothing conventions for volatility series.
//!
//! Two conventions are supported and they are not interchangeable:
//! - `Simple`: arithmetic mean of the last `period` values.
//! - `Wilder`: RMA, an exponential average with `alpha = 1 / period`,
//!   seeded with the simple mean of the first `period` values.
//!
//! Each recurrence lives in exactly one streaming type. The batch functions
//! drive those types, so batch and streaming output can never drift apart.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;
use supertrend_core::error::IndicatorError;
use supertrend_core::traits::{BoxedSmoother, StreamingIndicator};

/// Smoothing convention selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Smoothing {
    #[serde(alias = "sma")]
    Simple,
    #[default]
    #[serde(alias = "rma")]
    Wilder,
}

impl Smoothing {
    /// Build a streaming smoother for this convention.
    pub fn smoother(self, period: usize) -> Result<BoxedSmoother, IndicatorError> {
        Ok(match self {
            Smoothing::Simple => Box::new(StreamingSma::new(period)?),
            Smoothing::Wilder => Box::new(StreamingRma::new(period)?),
        })
    }

    /// Smooth a whole series with this convention.
    pub fn apply(self, series: &[f64], period: usize) -> Vec<f64> {
        match self {
            Smoothing::Simple => smooth_sma(series, period),
            Smoothing::Wilder => smooth_rma(series, period),
        }
    }
}

impl fmt::Display for Smoothing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Smoothing::Simple => "simple",
            Smoothing::Wilder => "wilder",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Smoothing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "simple" | "sma" => Ok(Smoothing::Simple),
            "wilder" | "rma" | "smma" => Ok(Smoothing::Wilder),
            _ => Err(format!("Invalid smoothing: {}", s)),
        }
    }
}

/// Simple moving average over a sliding window.
///
/// A NaN inside the window makes only that window's output NaN. The mean
/// is summed from the window on every read; no running total is carried.
#[derive(Debug, Clone)]
pub struct StreamingSma {
    period: usize,
    window: VecDeque<f64>,
    nan_count: usize,
}

impl StreamingSma {
    /// Create a new streaming SMA.
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        IndicatorError::check_period("SMA", period)?;
        Ok(Self::with_period(period))
    }

    fn with_period(period: usize) -> Self {
        Self {
            period,
            window: VecDeque::with_capacity(period + 1),
            nan_count: 0,
        }
    }
}

impl StreamingIndicator for StreamingSma {
    type Input = f64;
    type Output = f64;

    fn update(&mut self, value: f64) -> Option<f64> {
        self.window.push_back(value);
        if value.is_nan() {
            self.nan_count += 1;
        }

        if self.window.len() > self.period {
            if let Some(old) = self.window.pop_front() {
                if old.is_nan() {
                    self.nan_count -= 1;
                }
            }
        }

        self.current()
    }

    fn current(&self) -> Option<f64> {
        if !self.is_ready() {
            return None;
        }
        if self.nan_count > 0 {
            return Some(f64::NAN);
        }
        Some(self.window.iter().sum::<f64>() / self.period as f64)
    }

    fn reset(&mut self) {
        self.window.clear();
        self.nan_count = 0;
    }

    fn is_ready(&self) -> bool {
        self.period > 0 && self.window.len() >= self.period
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "SMA"
    }
}

/// Wilder's moving average (RMA).
#[derive(Debug, Clone)]
pub struct StreamingRma {
    period: usize,
    count: usize,
    sum: f64,
    current: Option<f64>,
}

impl StreamingRma {
    /// Create a new streaming RMA.
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        IndicatorError::check_period("RMA", period)?;
        Ok(Self::with_period(period))
    }

    fn with_period(period: usize) -> Self {
        Self {
            period,
            count: 0,
            sum: 0.0,
            current: None,
        }
    }
}

impl StreamingIndicator for StreamingRma {
    type Input = f64;
    type Output = f64;

    fn update(&mut self, value: f64) -> Option<f64> {
        match self.current {
            Some(prev) => {
                self.current = Some(prev + (value - prev) / self.period as f64);
            }
            None => {
                // Seed with the simple mean of the first `period` values
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
        self.count = 0;
        self.sum = 0.0;
        self.current = None;
    }

    fn is_ready(&self) -> bool {
        self.current.is_some()
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "RMA"
    }
}

fn drive<S>(mut smoother: S, series: &[f64]) -> Vec<f64>
where
    S: StreamingIndicator<Input = f64, Output = f64>,
{
    series
        .iter()
        .map(|&v| smoother.update(v).unwrap_or(f64::NAN))
        .collect()
}

/// Simple moving average, aligned with `series`.
///
/// The first `period - 1` positions are NaN. A zero period yields all NaN.
pub fn smooth_sma(series: &[f64], period: usize) -> Vec<f64> {
    drive(StreamingSma::with_period(period), series)
}

/// Wilder's smoothing, aligned with `series`.
///
/// Index `period - 1` holds the mean of the first `period` values; every
/// later index is `out[i-1] + (series[i] - out[i-1]) / period`. Earlier
/// positions are NaN. A zero period yields all NaN.
pub fn smooth_rma(series: &[f64], period: usize) -> Vec<f64> {
    drive(StreamingRma::with_period(period), series)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-10,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_sma_alignment() {
        let result = smooth_sma(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);

        assert_eq!(result.len(), 5);
        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert_close(result[2], 2.0);
        assert_close(result[3], 3.0);
        assert_close(result[4], 4.0);
    }

    #[test]
    fn test_sma_nan_only_poisons_its_window() {
        let result = smooth_sma(&[1.0, f64::NAN, 3.0, 4.0, 5.0], 2);

        assert!(result[1].is_nan());
        assert!(result[2].is_nan());
        assert_close(result[3], 3.5);
        assert_close(result[4], 4.5);
    }

    #[test]
    fn test_sma_recovers_after_large_value() {
        let result = smooth_sma(&[1e16, 1.0, 1.0, 1.0], 2);

        assert_eq!(result[2], 1.0);
        assert_eq!(result[3], 1.0);
    }

    #[test]
    fn test_rma_seed_and_recurrence() {
        let result = smooth_rma(&[2.0, 4.0, 6.0, 10.0], 3);

        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        // Seed: (2 + 4 + 6) / 3
        assert_close(result[2], 4.0);
        // 4 + (10 - 4) / 3
        assert_close(result[3], 6.0);
    }

    #[test]
    fn test_rma_constant_input_stays_constant() {
        let series = vec![7.5; 50];
        let result = smooth_rma(&series, 14);

        for value in &result[13..] {
            assert_close(*value, 7.5);
        }
    }

    #[test]
    fn test_rma_differs_from_sma() {
        let series = [1.0, 3.0, 2.0, 8.0, 4.0];
        let sma = smooth_sma(&series, 2);
        let rma = smooth_rma(&series, 2);

        // Both seed identically
        assert_close(sma[1], rma[1]);
        // Then the conventions diverge
        let diverged = sma[2..]
            .iter()
            .zip(&rma[2..])
            .any(|(s, r)| (s - r).abs() > 1e-9);
        assert!(diverged);
    }

    #[test]
    fn test_zero_period_yields_nan() {
        assert!(smooth_sma(&[1.0, 2.0], 0).iter().all(|v| v.is_nan()));
        assert!(smooth_rma(&[1.0, 2.0], 0).iter().all(|v| v.is_nan()));
        assert!(StreamingSma::new(0).is_err());
        assert!(StreamingRma::new(0).is_err());
    }

    #[test]
    fn test_streaming_matches_batch() {
        let series: Vec<f64> = (0..40).map(|i| 10.0 + (i as f64 * 0.7).sin()).collect();
        let batch = smooth_rma(&series, 5);

        let mut rma = Smoothing::Wilder.smoother(5).unwrap();
        for (i, &v) in series.iter().enumerate() {
            match rma.update(v) {
                Some(out) => assert_eq!(out.to_bits(), batch[i].to_bits()),
                None => assert!(batch[i].is_nan()),
            }
        }
    }

    #[test]
    fn test_reset() {
        let mut sma = StreamingSma::new(2).unwrap();
        sma.update(1.0);
        sma.update(2.0);
        assert!(sma.is_ready());

        sma.reset();
        assert!(!sma.is_ready());
        assert!(sma.current().is_none());
        assert!(sma.update(5.0).is_none());
    }

    #[test]
    fn test_smoothing_parse() {
        assert_eq!("wilder".parse::<Smoothing>().unwrap(), Smoothing::Wilder);
        assert_eq!("RMA".parse::<Smoothing>().unwrap(), Smoothing::Wilder);
        assert_eq!("sma".parse::<Smoothing>().unwrap(), Smoothing::Simple);
        assert!("ema".parse::<Smoothing>().is_err());
        assert_eq!(Smoothing::default(), Smoothing::Wilder);
        assert_eq!(Smoothing::Simple.to_string(), "simple");
    }
}
