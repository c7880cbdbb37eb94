//! Core traits for the Supertrend engine.

mod data_source;
mod indicator;
mod strategy;

pub use data_source::DataSource;
pub use indicator::{BarIndicator, BoxedSmoother, Indicator, StreamingIndicator};
pub use strategy::{Strategy, StrategyConfig, StrategyState};
