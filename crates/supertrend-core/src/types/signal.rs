//! Trading signals emitted by strategies.
//!
//! A signal is advice to the caller. Sizing and order placement stay with
//! whoever consumes it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Kind of action a signal recommends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalType {
    Buy,
    Sell,
    CloseLong,
    CloseShort,
    Hold,
}

impl SignalType {
    /// Whether the signal opens a position.
    pub fn is_entry(self) -> bool {
        matches!(self, SignalType::Buy | SignalType::Sell)
    }

    /// Whether the signal closes a position.
    pub fn is_exit(self) -> bool {
        matches!(self, SignalType::CloseLong | SignalType::CloseShort)
    }
}

impl fmt::Display for SignalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SignalType::Buy => "BUY",
            SignalType::Sell => "SELL",
            SignalType::CloseLong => "CLOSE_LONG",
            SignalType::CloseShort => "CLOSE_SHORT",
            SignalType::Hold => "HOLD",
        };
        write!(f, "{}", s)
    }
}

/// Qualitative strength of a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalStrength {
    Weak,
    Moderate,
    Strong,
}

/// Context attached to a signal for logging and review.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignalMetadata {
    /// Strategy that produced the signal
    pub strategy_name: String,
    /// Indicator values at the time of the signal
    pub indicators: HashMap<String, f64>,
    /// Human readable reason
    pub reason: String,
    /// Suggested protective level (e.g. trailing-stop band)
    pub stop_level: Option<f64>,
}

/// A trading signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    pub symbol: String,
    pub signal_type: SignalType,
    pub strength: SignalStrength,
    /// Reference price (close of the triggering bar)
    pub price: f64,
    /// Timestamp of the triggering bar (Unix ms)
    pub timestamp: i64,
    /// Confidence in [0, 1]
    pub confidence: f64,
    pub metadata: SignalMetadata,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} @ {:.4} ({})",
            self.signal_type, self.symbol, self.price, self.metadata.reason
        )
    }
}
