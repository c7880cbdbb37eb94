//! Signal strategies built on the Supertrend engine.
//!
//! - Supertrend Flip: a signal on every direction change
//! - Triple Confirmation: flips filtered by a trailing Supertrend, a
//!   three-member consensus, an EMA/RMA pair and volume
//!
//! Strategies only emit signals. Sizing and order placement live elsewhere.

mod registry;
mod supertrend_flip;
mod triple_confirmation;

pub use registry::{StrategyInfo, StrategyRegistry};
pub use supertrend_flip::{SupertrendFlipConfig, SupertrendFlipStrategy};
pub use triple_confirmation::{TradeBias, TripleConfirmationConfig, TripleConfirmationStrategy};
