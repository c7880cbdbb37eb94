//! Core types and traits for the Supertrend engine.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Bar, BarSeries)
//! - Trend direction and trading signals
//! - Core traits for indicators, strategies, and data sources

pub mod types;
pub mod traits;
pub mod error;

pub use error::{TrendError, TrendResult};
pub use types::*;
pub use traits::*;
