//! Agreement between several Supertrends with different parameters.

use crate::supertrend::{Supertrend, SupertrendOutput, SupertrendParams};
use serde::{Deserialize, Serialize};
use supertrend_core::error::IndicatorError;
use supertrend_core::types::{Bar, Direction};

/// Combined view of the member trends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Consensus {
    /// Every member is defined and in an uptrend
    Bullish,
    /// Every member is defined and in a downtrend
    Bearish,
    Mixed,
}

/// A set of independent Supertrends that vote on direction.
#[derive(Debug)]
pub struct TrendConsensus {
    members: Vec<Supertrend>,
    last: Vec<SupertrendOutput>,
}

impl TrendConsensus {
    /// Build from member parameters. At least one member is required.
    pub fn new(params: &[SupertrendParams]) -> Result<Self, IndicatorError> {
        if params.is_empty() {
            return Err(IndicatorError::InvalidParameter(
                "consensus needs at least one Supertrend".into(),
            ));
        }
        let members = params
            .iter()
            .map(|p| Supertrend::new(*p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            members,
            last: Vec::new(),
        })
    }

    /// The classic triple confirmation set: (10, 1.0), (11, 2.0), (12, 3.0).
    pub fn triple() -> Result<Self, IndicatorError> {
        Self::new(&[
            SupertrendParams::new(10, 1.0),
            SupertrendParams::new(11, 2.0),
            SupertrendParams::new(12, 3.0),
        ])
    }

    /// Feed the next bar to every member.
    pub fn update(&mut self, bar: &Bar) -> Consensus {
        self.last = self.members.iter_mut().map(|m| m.update(bar)).collect();
        self.consensus()
    }

    /// Consensus over the most recent outputs.
    pub fn consensus(&self) -> Consensus {
        if self.last.is_empty() || self.last.iter().any(|o| !o.is_defined()) {
            return Consensus::Mixed;
        }
        if self.last.iter().all(|o| o.direction == Direction::Uptrend) {
            Consensus::Bullish
        } else if self.last.iter().all(|o| o.direction == Direction::Downtrend) {
            Consensus::Bearish
        } else {
            Consensus::Mixed
        }
    }

    /// Most recent output of each member, in construction order.
    pub fn outputs(&self) -> &[SupertrendOutput] {
        &self.last
    }

    /// Bars needed before every member is defined.
    pub fn warmup(&self) -> usize {
        self.members
            .iter()
            .map(|m| m.params().atr_period)
            .max()
            .unwrap_or(0)
    }

    pub fn reset(&mut self) {
        for member in &mut self.members {
            member.reset();
        }
        self.last.clear();
    }
}
