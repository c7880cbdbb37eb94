//! Triple Confirmation Strategy.
//!
//! Enters on a main Supertrend flip only when a faster trailing Supertrend,
//! a consensus of three further Supertrends, the EMA/RMA pair and volume
//! all agree, and price is not squeezed between the latest pivot support
//! and resistance. Exits at a reward:risk target (or at the target with an
//! RSI extreme), or when price touches the trailing Supertrend line.

use crate::supertrend_flip::{band_indicators, classify_strength};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use supertrend_core::{
    error::StrategyError,
    traits::{Strategy, StrategyConfig, StrategyState, StreamingIndicator},
    types::{Bar, BarSeries, Direction, Signal, SignalMetadata, SignalType},
};
use supertrend_indicators::{
    Consensus, PivotLevels, StreamingEma, StreamingPivots, StreamingRma, StreamingRsi,
    Supertrend, SupertrendOutput, SupertrendParams, TrendConsensus,
};
use tracing::debug;

/// Which side the strategy may open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeBias {
    #[default]
    Both,
    Long,
    Short,
}

impl TradeBias {
    fn allows(self, side: Side) -> bool {
        match (self, side) {
            (TradeBias::Both, _) => true,
            (TradeBias::Long, Side::Long) | (TradeBias::Short, Side::Short) => true,
            _ => false,
        }
    }
}

/// Configuration for the Triple Confirmation strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripleConfirmationConfig {
    /// Symbols to trade
    #[serde(default)]
    pub symbols: Vec<String>,
    /// Supertrend whose flips trigger entries
    pub main: SupertrendParams,
    /// Fast Supertrend used as trailing stop
    pub trailing: SupertrendParams,
    /// Supertrends that must all agree with the entry direction
    pub confirmation: Vec<SupertrendParams>,
    /// Period of the EMA/RMA close filter
    pub ma_period: usize,
    #[serde(default)]
    pub bias: TradeBias,
    /// Bars of volume to average, current bar included (0 disables the filter)
    pub volume_lookback: usize,
    /// Skip entries while close is between pivot support and resistance
    pub use_squeeze_filter: bool,
    /// Bars each side of a pivot high/low
    pub pivot_lookback: usize,
    /// Emit exits when price touches the trailing line
    pub use_trailing_stop: bool,
    /// Emit exits at the reward:risk target
    pub take_profit: bool,
    /// Target distance as a multiple of the entry risk
    pub reward_risk_ratio: f64,
    /// Gap between the trailing line and the entry stop
    pub stop_offset: f64,
    pub rsi_period: usize,
    /// Long exit at target once RSI reaches this
    pub rsi_overbought: f64,
    /// Short exit at target once RSI falls to this
    pub rsi_oversold: f64,
}

impl Default for TripleConfirmationConfig {
    fn default() -> Self {
        Self {
            symbols: vec![],
            main: SupertrendParams::new(10, 3.0),
            trailing: SupertrendParams::new(3, 1.5),
            confirmation: vec![
                SupertrendParams::new(10, 1.0),
                SupertrendParams::new(11, 2.0),
                SupertrendParams::new(12, 3.0),
            ],
            ma_period: 9,
            bias: TradeBias::Both,
            volume_lookback: 10,
            use_squeeze_filter: true,
            pivot_lookback: 3,
            use_trailing_stop: true,
            take_profit: true,
            reward_risk_ratio: 1.5,
            stop_offset: 0.02,
            rsi_period: 14,
            rsi_overbought: 80.0,
            rsi_oversold: 20.0,
        }
    }
}

impl StrategyConfig for TripleConfirmationConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        self.main.validate()?;
        self.trailing.validate()?;
        if self.confirmation.is_empty() {
            return Err(StrategyError::InvalidConfig(
                "At least one confirmation Supertrend required".into(),
            ));
        }
        for params in &self.confirmation {
            params.validate()?;
        }
        if self.ma_period == 0 {
            return Err(StrategyError::InvalidConfig(
                "MA period must be positive".into(),
            ));
        }
        if self.pivot_lookback == 0 || self.rsi_period == 0 {
            return Err(StrategyError::InvalidConfig(
                "Pivot lookback and RSI period must be positive".into(),
            ));
        }
        if !self.reward_risk_ratio.is_finite() || self.reward_risk_ratio <= 0.0 {
            return Err(StrategyError::InvalidConfig(format!(
                "Reward:risk ratio must be positive, got {}",
                self.reward_risk_ratio
            )));
        }
        if !self.stop_offset.is_finite() || self.stop_offset < 0.0 {
            return Err(StrategyError::InvalidConfig(format!(
                "Stop offset must be non-negative, got {}",
                self.stop_offset
            )));
        }
        if !(0.0..=100.0).contains(&self.rsi_oversold)
            || !(0.0..=100.0).contains(&self.rsi_overbought)
            || self.rsi_oversold >= self.rsi_overbought
        {
            return Err(StrategyError::InvalidConfig(
                "RSI thresholds must satisfy 0 <= oversold < overbought <= 100".into(),
            ));
        }
        if self.symbols.is_empty() {
            return Err(StrategyError::InvalidConfig(
                "At least one symbol required".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Long,
    Short,
}

/// Triple Confirmation Strategy.
pub struct TripleConfirmationStrategy {
    config: TripleConfirmationConfig,
    main: Supertrend,
    trailing: Supertrend,
    consensus: TrendConsensus,
    ema: StreamingEma,
    rma: StreamingRma,
    rsi: StreamingRsi,
    pivots: StreamingPivots,
    levels: PivotLevels,
    /// Last defined trailing line value
    stop_level: Option<f64>,
    /// Take-profit price fixed at entry
    target: Option<f64>,
    position: Option<Side>,
    last_main: Option<SupertrendOutput>,
    bars_processed: usize,
    signals_generated: usize,
}

impl TripleConfirmationStrategy {
    /// Create a new Triple Confirmation strategy.
    pub fn new(config: TripleConfirmationConfig) -> Result<Self, StrategyError> {
        Ok(Self {
            main: Supertrend::new(config.main)?,
            trailing: Supertrend::new(config.trailing)?,
            consensus: TrendConsensus::new(&config.confirmation)?,
            ema: StreamingEma::new(config.ma_period)?,
            rma: StreamingRma::new(config.ma_period)?,
            rsi: StreamingRsi::new(config.rsi_period)?,
            pivots: StreamingPivots::symmetric(config.pivot_lookback)?,
            config,
            levels: PivotLevels::default(),
            stop_level: None,
            target: None,
            position: None,
            last_main: None,
            bars_processed: 0,
            signals_generated: 0,
        })
    }

    fn volume_ok(&self, series: &BarSeries, bar: &Bar) -> bool {
        if self.config.volume_lookback == 0 {
            return true;
        }
        let recent = series.recent_volumes(self.config.volume_lookback);
        if recent.is_empty() {
            return true;
        }
        let mean = recent.iter().sum::<f64>() / recent.len() as f64;
        bar.volume >= mean
    }

    fn check_entry(
        &self,
        series: &BarSeries,
        bar: &Bar,
        main: &SupertrendOutput,
        trailing: &SupertrendOutput,
    ) -> Option<Side> {
        if !main.flipped || !trailing.is_defined() || !self.volume_ok(series, bar) {
            return None;
        }
        if self.config.use_squeeze_filter && self.levels.squeezes(bar.close) {
            debug!(
                close = bar.close,
                support = ?self.levels.support,
                resistance = ?self.levels.resistance,
                "entry skipped inside pivot range"
            );
            return None;
        }
        let (ema, rma) = (self.ema.current()?, self.rma.current()?);
        let consensus = self.consensus.consensus();

        let bullish_ma = ema > rma && bar.is_bullish() && bar.close > ema;
        let bearish_ma = ema < rma && bar.is_bearish() && bar.close < ema;

        let long = main.direction == Direction::Uptrend
            && trailing.direction == Direction::Uptrend
            && consensus == Consensus::Bullish
            && !bearish_ma
            && bar.is_bullish()
            && bar.close > ema
            && bar.close > rma
            && self.config.bias.allows(Side::Long);

        let short = main.direction == Direction::Downtrend
            && trailing.direction == Direction::Downtrend
            && consensus == Consensus::Bearish
            && !bullish_ma
            && bar.is_bearish()
            && bar.close < ema
            && bar.close < rma
            && self.config.bias.allows(Side::Short);

        if long {
            Some(Side::Long)
        } else if short {
            Some(Side::Short)
        } else {
            None
        }
    }

    /// Reward:risk target for an entry at `close` against the trailing line.
    fn target_for(&self, side: Side, close: f64, trailing: f64) -> f64 {
        let ratio = self.config.reward_risk_ratio;
        match side {
            Side::Long => {
                let stop = trailing - self.config.stop_offset;
                close + ratio * (close - stop)
            }
            Side::Short => {
                let stop = trailing + self.config.stop_offset;
                close - ratio * (stop - close)
            }
        }
    }

    /// Exit reason for the open position on this bar, if any.
    fn check_exit(&self, side: Side, bar: &Bar) -> Option<String> {
        if self.config.take_profit {
            if let Some(target) = self.target {
                let rsi = self.rsi.current();
                match side {
                    Side::Long => {
                        if bar.close >= target
                            && rsi.is_some_and(|r| r >= self.config.rsi_overbought)
                        {
                            return Some(format!("RSI overbought at target {:.2}", target));
                        }
                        if bar.high >= target {
                            return Some(format!(
                                "High {:.2} reached target {:.2}",
                                bar.high, target
                            ));
                        }
                    }
                    Side::Short => {
                        if bar.close <= target
                            && rsi.is_some_and(|r| r <= self.config.rsi_oversold)
                        {
                            return Some(format!("RSI oversold at target {:.2}", target));
                        }
                        if bar.low <= target {
                            return Some(format!(
                                "Low {:.2} reached target {:.2}",
                                bar.low, target
                            ));
                        }
                    }
                }
            }
        }

        if !self.config.use_trailing_stop {
            return None;
        }
        match (side, self.stop_level) {
            (Side::Long, Some(stop)) if bar.low <= stop => {
                Some(format!("Low {:.2} touched trailing stop", bar.low))
            }
            (Side::Short, Some(stop)) if bar.high >= stop => {
                Some(format!("High {:.2} touched trailing stop", bar.high))
            }
            _ => None,
        }
    }

    fn indicators(
        &self,
        main: &SupertrendOutput,
        trailing: &SupertrendOutput,
    ) -> HashMap<String, f64> {
        let mut indicators: HashMap<String, f64> = band_indicators(main).into_iter().collect();
        indicators.insert("trailing_stop".to_string(), trailing.value);
        if let Some(ema) = self.ema.current() {
            indicators.insert("ema".to_string(), ema);
        }
        if let Some(rma) = self.rma.current() {
            indicators.insert("rma".to_string(), rma);
        }
        if let Some(rsi) = self.rsi.current() {
            indicators.insert("rsi".to_string(), rsi);
        }
        if let Some(target) = self.target {
            indicators.insert("target".to_string(), target);
        }
        if let Some(support) = self.levels.support {
            indicators.insert("support".to_string(), support);
        }
        if let Some(resistance) = self.levels.resistance {
            indicators.insert("resistance".to_string(), resistance);
        }
        indicators
    }
}

impl Strategy for TripleConfirmationStrategy {
    fn name(&self) -> &str {
        "Triple Confirmation"
    }

    fn description(&self) -> &str {
        "Supertrend flips confirmed by a trailing Supertrend, a triple consensus, EMA/RMA and volume"
    }

    fn on_bar(&mut self, series: &BarSeries) -> Option<Signal> {
        let bar = *series.last()?;
        self.bars_processed += 1;

        let main = self.main.update(&bar);
        let trailing = self.trailing.update(&bar);
        self.consensus.update(&bar);
        self.ema.update(bar.close);
        self.rma.update(bar.close);
        self.rsi.update(bar.close);
        self.levels = self.pivots.update(&bar);
        self.last_main = Some(main);
        if trailing.is_defined() {
            self.stop_level = Some(trailing.value);
        }

        let (signal_type, reason) = match self.position {
            Some(side) => {
                let reason = self.check_exit(side, &bar)?;
                self.position = None;
                self.target = None;
                match side {
                    Side::Long => (SignalType::CloseLong, reason),
                    Side::Short => (SignalType::CloseShort, reason),
                }
            }
            None => {
                let side = self.check_entry(series, &bar, &main, &trailing)?;
                self.position = Some(side);
                self.target = Some(self.target_for(side, bar.close, trailing.value));
                match side {
                    Side::Long => (
                        SignalType::Buy,
                        format!("Uptrend flip confirmed at {:.2}", bar.close),
                    ),
                    Side::Short => (
                        SignalType::Sell,
                        format!("Downtrend flip confirmed at {:.2}", bar.close),
                    ),
                }
            }
        };

        let (strength, confidence) = classify_strength(bar.close, &main);
        self.signals_generated += 1;

        debug!(
            symbol = %series.symbol,
            signal = %signal_type,
            stop = ?self.stop_level,
            "triple confirmation signal"
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
                indicators: self.indicators(&main, &trailing),
                reason,
                stop_level: self.stop_level,
            },
        })
    }

    fn reset(&mut self) {
        self.main.reset();
        self.trailing.reset();
        self.consensus.reset();
        self.ema.reset();
        self.rma.reset();
        self.rsi.reset();
        self.pivots.reset();
        self.levels = PivotLevels::default();
        self.stop_level = None;
        self.target = None;
        self.position = None;
        self.last_main = None;
        self.bars_processed = 0;
        self.signals_generated = 0;
    }

    fn state(&self) -> StrategyState {
        let position = match self.position {
            Some(Side::Long) => "long",
            Some(Side::Short) => "short",
            None => "flat",
        };
        StrategyState {
            name: self.name().to_string(),
            is_warmed_up: self.bars_processed >= self.warmup_period(),
            bars_processed: self.bars_processed,
            signals_generated: self.signals_generated,
            indicators: self
                .last_main
                .map(|o| band_indicators(&o).into_iter().collect())
                .unwrap_or_default(),
            custom: serde_json::json!({
                "position": position,
                "stop_level": self.stop_level,
                "target": self.target,
                "consensus": self.consensus.consensus(),
                "bias": self.config.bias,
            }),
        }
    }

    fn warmup_period(&self) -> usize {
        self.config
            .main
            .atr_period
            .max(self.config.trailing.atr_period)
            .max(self.consensus.warmup())
            .max(self.config.ma_period)
            .max(self.rsi.period())
    }

    fn symbols(&self) -> &[String] {
        &self.config.symbols
    }
}
