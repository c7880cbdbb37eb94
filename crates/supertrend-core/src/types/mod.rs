//! Core data types for the Supertrend engine.

mod direction;
mod ohlcv;
mod signal;

pub use direction::Direction;
pub use ohlcv::{Bar, BarSeries};
pub use signal::{Signal, SignalMetadata, SignalStrength, SignalType};
