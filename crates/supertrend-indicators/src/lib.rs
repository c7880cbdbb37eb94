//! Volatility-band trend indicators.
//!
//! This crate provides:
//! - True range and its SIMD batch kernel
//! - Simple and Wilder (RMA) smoothing behind one `Smoothing` selector
//! - Average True Range, batch and streaming
//! - The Supertrend band/trend-line state machine
//! - Multi-Supertrend consensus used for trend confirmation
//! - RSI and confirmed pivot levels used by strategy exits and filters
//!
//! Values that cannot be computed yet are NaN. Nothing in this crate
//! returns an error after construction.

pub mod consensus;
pub mod momentum;
pub mod moving_average;
pub mod pivot;
pub mod simd;
pub mod smoothing;
pub mod supertrend;
pub mod volatility;

pub use consensus::{Consensus, TrendConsensus};
pub use momentum::StreamingRsi;
pub use moving_average::{Ema, Rma, Sma, StreamingEma};
pub use pivot::{PivotLevels, StreamingPivots};
pub use smoothing::{smooth_rma, smooth_sma, Smoothing, StreamingRma, StreamingSma};
pub use supertrend::{BandState, Supertrend, SupertrendOutput, SupertrendParams};
pub use volatility::{true_range, true_range_series, Atr, StreamingAtr};
