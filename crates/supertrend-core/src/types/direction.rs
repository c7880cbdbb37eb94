//! Trend direction.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of the trend line.
///
/// A fresh band state starts in `Downtrend`; the direction only changes on a
/// confirmed breakout of the opposite band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Uptrend,
    #[default]
    Downtrend,
}

impl Direction {
    #[inline]
    pub fn is_up(self) -> bool {
        self == Direction::Uptrend
    }

    #[inline]
    pub fn is_down(self) -> bool {
        self == Direction::Downtrend
    }

    /// The other direction.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Uptrend => Direction::Downtrend,
            Direction::Downtrend => Direction::Uptrend,
        }
    }

    /// Charting-platform sign convention: -1 for uptrend, 1 for downtrend.
    pub fn as_sign(self) -> i8 {
        match self {
            Direction::Uptrend => -1,
            Direction::Downtrend => 1,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::Uptrend => "up",
            Direction::Downtrend => "down",
        };
        write!(f, "{}", s)
    }
}
