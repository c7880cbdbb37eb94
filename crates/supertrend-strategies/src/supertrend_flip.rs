//! Supertrend Flip Strategy.
//!
//! Buys when the Supertrend flips to an uptrend and sells when it flips to
//! a downtrend. No other filter.

use serde::{Deserialize, Serialize};
use supertrend_core::{
    error::StrategyError,
    traits::{Strategy, StrategyConfig, StrategyState},
    types::{BarSeries, Direction, Signal, SignalMetadata, SignalStrength, SignalType},
};
use supertrend_indicators::{Smoothing, Supertrend, SupertrendOutput, SupertrendParams};
use tracing::debug;

/// Configuration for the Supertrend Flip strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupertrendFlipConfig {
    /// Symbols to trade
    #[serde(default)]
    pub symbols: Vec<String>,
    /// ATR lookback period
    pub atr_period: usize,
    /// Band multiplier
    pub factor: f64,
    /// ATR smoothing convention
    #[serde(default)]
    pub smoothing: Smoothing,
}

impl SupertrendFlipConfig {
    pub fn params(&self) -> SupertrendParams {
        SupertrendParams::new(self.atr_period, self.factor).with_smoothing(self.smoothing)
    }
}

impl Default for SupertrendFlipConfig {
    fn default() -> Self {
        Self {
            symbols: vec![],
            atr_period: 10,
            factor: 3.0,
            smoothing: Smoothing::Wilder,
        }
    }
}

impl StrategyConfig for SupertrendFlipConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        self.params().validate()?;
        if self.symbols.is_empty() {
            return Err(StrategyError::InvalidConfig(
                "At least one symbol required".into(),
            ));
        }
        Ok(())
    }
}

/// Strength from how far the close sits beyond the trend line, in ATRs.
pub(crate) fn classify_strength(close: f64, output: &SupertrendOutput) -> (SignalStrength, f64) {
    let distance = if output.atr > 0.0 {
        ((close - output.value) / output.atr).abs()
    } else {
        0.0
    };
    let strength = if distance > 2.0 {
        SignalStrength::Strong
    } else if distance > 1.0 {
        SignalStrength::Moderate
    } else {
        SignalStrength::Weak
    };
    (strength, (distance / 3.0).min(1.0))
}

pub(crate) fn band_indicators(output: &SupertrendOutput) -> [(String, f64); 4] {
    [
        ("supertrend".to_string(), output.value),
        ("atr".to_string(), output.atr),
        ("upper".to_string(), output.upper),
        ("lower".to_string(), output.lower),
    ]
}

/// Supertrend Flip Strategy.
pub struct SupertrendFlipStrategy {
    config: SupertrendFlipConfig,
    engine: Supertrend,
    last: Option<SupertrendOutput>,
    bars_processed: usize,
    signals_generated: usize,
}

impl SupertrendFlipStrategy {
    /// Create a new Supertrend Flip strategy.
    pub fn new(config: SupertrendFlipConfig) -> Result<Self, StrategyError> {
        let engine = Supertrend::new(config.params())?;
        Ok(Self {
            config,
            engine,
            last: None,
            bars_processed: 0,
            signals_generated: 0,
        })
    }
}

impl Strategy for SupertrendFlipStrategy {
    fn name(&self) -> &str {
        "Supertrend Flip"
    }

    fn description(&self) -> &str {
        "Signals on every Supertrend direction flip"
    }

    fn on_bar(&mut self, series: &BarSeries) -> Option<Signal> {
        let bar = *series.last()?;
        self.bars_processed += 1;

        let output = self.engine.update(&bar);
        self.last = Some(output);

        if !output.flipped {
            return None;
        }

        let (signal_type, reason) = match output.direction {
            Direction::Uptrend => (
                SignalType::Buy,
                format!("Close {:.2} broke above the upper band", bar.close),
            ),
            Direction::Downtrend => (
                SignalType::Sell,
                format!("Close {:.2} broke below the lower band", bar.close),
            ),
        };
        let (strength, confidence) = classify_strength(bar.close, &output);
        self.signals_generated += 1;

        debug!(
            symbol = %series.symbol,
            signal = %signal_type,
            line = output.value,
            "supertrend flip signal"
        );

        Some(Signal {
            symbol: series.symbol.clone(),
            signal_type,
            strength,
            price: bar.close,
            timestamp: bar.timestamp,
            confidence,
            metadata: SignalMetadata {
                strategy_name: self.name().to_string(),
                indicators: band_indicators(&output).into_iter().collect(),
                reason,
                stop_level: Some(output.value),
            },
        })
    }

    fn reset(&mut self) {
        self.engine.reset();
        self.last = None;
        self.bars_processed = 0;
        self.signals_generated = 0;
    }

    fn state(&self) -> StrategyState {
        StrategyState {
            name: self.name().to_string(),
            is_warmed_up: self.engine.is_ready(),
            bars_processed: self.bars_processed,
            signals_generated: self.signals_generated,
            indicators: self
                .last
                .map(|o| band_indicators(&o).into_iter().collect())
                .unwrap_or_default(),
            custom: serde_json::json!({
                "atr_period": self.config.atr_period,
                "factor": self.config.factor,
                "smoothing": self.config.smoothing,
                "direction": self.engine.direction(),
            }),
        }
    }

    fn warmup_period(&self) -> usize {
        self.config.atr_period
    }

    fn symbols(&self) -> &[String] {
        &self.config.symbols
    }
}
