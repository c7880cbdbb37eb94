//! Strategy trait definitions.

use crate::error::StrategyError;
use crate::types::{BarSeries, Signal};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration trait for strategies.
pub trait StrategyConfig: Send + Sync + Clone + 'static {
    /// Validate the configuration.
    fn validate(&self) -> Result<(), StrategyError>;
}

/// State of a strategy for monitoring and serialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrategyState {
    /// Strategy name
    pub name: String,
    /// Whether the strategy has processed enough bars to generate signals
    pub is_warmed_up: bool,
    /// Number of bars processed
    pub bars_processed: usize,
    /// Number of signals generated
    pub signals_generated: usize,
    /// Current indicator values
    pub indicators: HashMap<String, f64>,
    /// Custom strategy-specific state
    pub custom: serde_json::Value,
}

/// Core strategy trait.
///
/// Strategies receive bars one at a time, in order, and emit signals.
/// Each instance owns its indicator state; two instances never share it.
pub trait Strategy: Send + Sync {
    /// Get the unique name of this strategy.
    fn name(&self) -> &str;

    /// Process the newest bar of `series` and optionally generate a signal.
    ///
    /// Called once per appended bar. The strategy reads `series.last()` and
    /// may use earlier bars for lookback filters.
    fn on_bar(&mut self, series: &BarSeries) -> Option<Signal>;

    /// Reset the strategy state.
    fn reset(&mut self);

    /// Get the current strategy state for monitoring.
    fn state(&self) -> StrategyState;

    /// Get the warmup period (number of bars needed before generating signals).
    fn warmup_period(&self) -> usize;

    /// Get the symbols this strategy trades.
    fn symbols(&self) -> &[String];

    /// Check if the strategy is warmed up (has enough data).
    fn is_warmed_up(&self, bars_available: usize) -> bool {
        bars_available >= self.warmup_period()
    }

    /// Get a description of the strategy.
    fn description(&self) -> &str {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountingStrategy {
        symbols: Vec<String>,
        warmup: usize,
        bars_seen: usize,
    }

    impl Strategy for CountingStrategy {
        fn name(&self) -> &str {
            "counting"
        }

        fn on_bar(&mut self, _series: &BarSeries) -> Option<Signal> {
            self.bars_seen += 1;
            None
        }

        fn reset(&mut self) {
            self.bars_seen = 0;
        }

        fn state(&self) -> StrategyState {
            StrategyState {
                name: self.name().to_string(),
                is_warmed_up: self.bars_seen >= self.warmup,
                bars_processed: self.bars_seen,
                ..Default::default()
            }
        }

        fn warmup_period(&self) -> usize {
            self.warmup
        }

        fn symbols(&self) -> &[String] {
            &self.symbols
        }
    }

    #[test]
    fn test_strategy_warmup() {
        let strategy = CountingStrategy {
            symbols: vec!["ES".to_string()],
            warmup: 20,
            bars_seen: 0,
        };

        assert!(!strategy.is_warmed_up(19));
        assert!(strategy.is_warmed_up(20));
        assert_eq!(strategy.description(), "");
    }

    #[test]
    fn test_state_reflects_bars() {
        let mut strategy = CountingStrategy {
            symbols: vec![],
            warmup: 2,
            bars_seen: 0,
        };
        let series = BarSeries::new("ES");

        strategy.on_bar(&series);
        strategy.on_bar(&series);
        let state = strategy.state();
        assert!(state.is_warmed_up);
        assert_eq!(state.bars_processed, 2);

        strategy.reset();
        assert_eq!(strategy.state().bars_processed, 0);
    }
}
