//! Confirmed pivot highs and lows, held as resistance and support.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use supertrend_core::error::IndicatorError;
use supertrend_core::types::Bar;

/// Latest confirmed pivot levels. A level stays in force until a newer
/// pivot replaces it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PivotLevels {
    /// Most recent pivot high
    pub resistance: Option<f64>,
    /// Most recent pivot low
    pub support: Option<f64>,
}

impl PivotLevels {
    /// True when `close` sits strictly between support and resistance.
    pub fn squeezes(&self, close: f64) -> bool {
        match (self.support, self.resistance) {
            (Some(support), Some(resistance)) => support < close && close < resistance,
            _ => false,
        }
    }
}

/// Streaming pivot detector.
///
/// A bar is a pivot high when its high is the maximum of the `left` bars
/// before it and the `right` bars after it (ties count). The pivot is only
/// known `right` bars later, so levels never look ahead.
#[derive(Debug, Clone)]
pub struct StreamingPivots {
    left: usize,
    right: usize,
    highs: VecDeque<f64>,
    lows: VecDeque<f64>,
    levels: PivotLevels,
}

impl StreamingPivots {
    pub fn new(left: usize, right: usize) -> Result<Self, IndicatorError> {
        IndicatorError::check_period("Pivot left", left)?;
        IndicatorError::check_period("Pivot right", right)?;
        Ok(Self {
            left,
            right,
            highs: VecDeque::with_capacity(left + right + 2),
            lows: VecDeque::with_capacity(left + right + 2),
            levels: PivotLevels::default(),
        })
    }

    /// Same lookback on both sides.
    pub fn symmetric(bars: usize) -> Result<Self, IndicatorError> {
        Self::new(bars, bars)
    }

    /// Feed the next bar and return the levels in force after it.
    pub fn update(&mut self, bar: &Bar) -> PivotLevels {
        let span = self.left + self.right + 1;
        self.highs.push_back(bar.high);
        self.lows.push_back(bar.low);
        if self.highs.len() > span {
            self.highs.pop_front();
            self.lows.pop_front();
        }

        if self.highs.len() == span {
            let high = self.highs[self.left];
            if self.highs.iter().all(|&h| h <= high) {
                self.levels.resistance = Some(high);
            }
            let low = self.lows[self.left];
            if self.lows.iter().all(|&l| l >= low) {
                self.levels.support = Some(low);
            }
        }

        self.levels
    }

    pub fn levels(&self) -> PivotLevels {
        self.levels
    }

    /// Bars until the first pivot can be confirmed.
    pub fn warmup(&self) -> usize {
        self.left + self.right + 1
    }

    pub fn reset(&mut self) {
        self.highs.clear();
        self.lows.clear();
        self.levels = PivotLevels::default();
    }
}
