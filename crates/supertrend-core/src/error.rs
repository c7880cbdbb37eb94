//! Error types for the Supertrend engine.
//!
//! "Not enough history yet" is deliberately absent from these enums:
//! indicators report it as NaN output, never as an error.

use thiserror::Error;

/// Top-level error.
#[derive(Error, Debug)]
pub enum TrendError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Strategy error: {0}")]
    Strategy(#[from] StrategyError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Indicator error: {0}")]
    Indicator(#[from] IndicatorError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Indicator construction errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndicatorError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl IndicatorError {
    /// Reject a zero lookback period.
    pub fn check_period(name: &str, period: usize) -> Result<(), IndicatorError> {
        if period == 0 {
            return Err(IndicatorError::InvalidParameter(format!(
                "{} period must be greater than 0",
                name
            )));
        }
        Ok(())
    }

    /// Reject a non-positive or non-finite band multiplier.
    pub fn check_factor(name: &str, factor: f64) -> Result<(), IndicatorError> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(IndicatorError::InvalidParameter(format!(
                "{} factor must be positive, got {}",
                name, factor
            )));
        }
        Ok(())
    }
}

/// Strategy-specific errors.
#[derive(Error, Debug)]
pub enum StrategyError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Strategy not found: {0}")]
    NotFound(String),

    #[error("Indicator setup failed: {0}")]
    Indicator(#[from] IndicatorError),
}

/// Data source errors.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("No data available at {0}")]
    NoDataAvailable(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid bar at row {row}: {reason}")]
    InvalidBar { row: usize, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for engine operations.
pub type TrendResult<T> = Result<T, TrendError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_checks() {
        assert!(IndicatorError::check_period("ATR", 0).is_err());
        assert!(IndicatorError::check_period("ATR", 1).is_ok());

        assert!(IndicatorError::check_factor("Supertrend", 0.0).is_err());
        assert!(IndicatorError::check_factor("Supertrend", -1.5).is_err());
        assert!(IndicatorError::check_factor("Supertrend", f64::NAN).is_err());
        assert!(IndicatorError::check_factor("Supertrend", 3.0).is_ok());
    }

    #[test]
    fn test_error_conversion() {
        let err: StrategyError = IndicatorError::InvalidParameter("bad".into()).into();
        assert!(matches!(err, StrategyError::Indicator(_)));

        let top: TrendError = err.into();
        assert!(top.to_string().starts_with("Strategy error"));
    }
}
