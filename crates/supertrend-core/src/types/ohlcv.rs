//! OHLCV (Open, High, Low, Close, Volume) data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// One time step of market data.
/// Uses f64 throughout so indicator math stays in IEEE-754 with NaN propagation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Trading volume
    pub volume: f64,
}

impl Bar {
    /// Create a new bar.
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Create a bar from high/low/close only; open is set to close, volume to zero.
    pub fn from_hlc(timestamp: i64, high: f64, low: f64, close: f64) -> Self {
        Self::new(timestamp, close, high, low, close, 0.0)
    }

    /// Midpoint of the bar's range, `(high + low) / 2`.
    #[inline]
    pub fn midpoint(&self) -> f64 {
        (self.high + self.low) / 2.0
    }

    /// Check if the bar is bullish (close > open).
    #[inline]
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// Check if the bar is bearish (close < open).
    #[inline]
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// Get the timestamp as a DateTime.
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }

    /// Calculate the true range.
    ///
    /// Without a previous close this is just `high - low`; otherwise the
    /// largest of the range and the two gaps to the previous close.
    pub fn true_range(&self, prev_close: Option<f64>) -> f64 {
        match prev_close {
            Some(pc) => {
                let hl = self.high - self.low;
                let hc = (self.high - pc).abs();
                let lc = (self.low - pc).abs();
                hl.max(hc).max(lc)
            }
            None => self.high - self.low,
        }
    }

    /// Describe why the bar is unusable, if it is.
    pub fn validate(&self) -> Result<(), String> {
        let prices = [self.open, self.high, self.low, self.close];
        if prices.iter().any(|p| !p.is_finite()) {
            return Err("non-finite price".to_string());
        }
        if self.high < self.low {
            return Err(format!("high {} below low {}", self.high, self.low));
        }
        Ok(())
    }
}

impl Default for Bar {
    fn default() -> Self {
        Self::new(0, 0.0, 0.0, 0.0, 0.0, 0.0)
    }
}

/// Time-series container for bars of one symbol.
#[derive(Debug, Clone)]
pub struct BarSeries {
    /// Symbol identifier
    pub symbol: String,
    bars: VecDeque<Bar>,
    /// Maximum capacity (0 = unlimited)
    capacity: usize,
}

impl BarSeries {
    /// Create a new empty bar series.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            bars: VecDeque::new(),
            capacity: 0,
        }
    }

    /// Create a bar series with a maximum capacity.
    /// When capacity is reached, oldest bars are removed.
    pub fn with_capacity(symbol: impl Into<String>, capacity: usize) -> Self {
        Self {
            symbol: symbol.into(),
            bars: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a new bar, removing the oldest if at capacity.
    pub fn push(&mut self, bar: Bar) {
        if self.capacity > 0 && self.bars.len() >= self.capacity {
            self.bars.pop_front();
        }
        self.bars.push_back(bar);
    }

    /// Push multiple bars.
    pub fn extend(&mut self, bars: impl IntoIterator<Item = Bar>) {
        for bar in bars {
            self.push(bar);
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Get the last bar.
    pub fn last(&self) -> Option<&Bar> {
        self.bars.back()
    }

    /// Get a bar by index (0 = oldest).
    pub fn get(&self, index: usize) -> Option<&Bar> {
        self.bars.get(index)
    }

    /// Volumes of the last `n` bars, the newest included.
    pub fn recent_volumes(&self, n: usize) -> Vec<f64> {
        let start = self.bars.len().saturating_sub(n);
        self.bars.range(start..).map(|b| b.volume).collect()
    }

    /// Clear all bars.
    pub fn clear(&mut self) {
        self.bars.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bar> {
        self.bars.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_calculations() {
        let bar = Bar::new(1000, 100.0, 110.0, 95.0, 105.0, 1000000.0);

        assert!((bar.midpoint() - 102.5).abs() < 1e-12);
        assert!(bar.is_bullish());
        assert!(!bar.is_bearish());
    }

    #[test]
    fn test_bar_true_range() {
        let bar = Bar::new(1000, 100.0, 110.0, 95.0, 105.0, 1000000.0);

        // First bar has no previous close
        assert!((bar.true_range(None) - 15.0).abs() < 1e-12);

        // Gap down from above
        assert!((bar.true_range(Some(120.0)) - 25.0).abs() < 1e-12);

        // Gap up from below
        assert!((bar.true_range(Some(90.0)) - 20.0).abs() < 1e-12);

        // Previous close inside the range
        assert!((bar.true_range(Some(100.0)) - 15.0).abs() < 1e-12);
    }

    #[test]
    fn test_bar_validate() {
        assert!(Bar::from_hlc(0, 10.0, 8.0, 9.0).validate().is_ok());
        assert!(Bar::from_hlc(0, 8.0, 10.0, 9.0).validate().is_err());
        assert!(Bar::from_hlc(0, f64::NAN, 8.0, 9.0).validate().is_err());
    }

    #[test]
    fn test_bar_series_capacity() {
        let mut series = BarSeries::with_capacity("AAPL", 3);

        series.push(Bar::new(1, 100.0, 101.0, 99.0, 100.5, 1000.0));
        series.push(Bar::new(2, 100.5, 102.0, 100.0, 101.5, 1000.0));
        series.push(Bar::new(3, 101.5, 103.0, 101.0, 102.5, 1000.0));
        assert_eq!(series.len(), 3);

        series.push(Bar::new(4, 102.5, 104.0, 102.0, 103.5, 1000.0));
        assert_eq!(series.len(), 3);
        assert_eq!(series.get(0).unwrap().timestamp, 2);
    }

    #[test]
    fn test_recent_volumes() {
        let mut series = BarSeries::new("AAPL");
        for (i, v) in [100.0, 200.0, 300.0, 400.0].iter().enumerate() {
            series.push(Bar::new(i as i64, 1.0, 1.0, 1.0, 1.0, *v));
        }

        assert_eq!(series.recent_volumes(2), vec![300.0, 400.0]);
        assert_eq!(series.recent_volumes(10), vec![100.0, 200.0, 300.0, 400.0]);
        assert!(BarSeries::new("X").recent_volumes(3).is_empty());
    }
}
