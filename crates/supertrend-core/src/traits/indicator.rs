//! Indicator trait definitions.

use crate::types::Bar;

/// Batch indicator over a single numeric series.
///
/// Output is aligned 1:1 with the input; positions that are not yet
/// computable hold NaN.
pub trait Indicator: Send + Sync {
    /// Calculate indicator values for the given data.
    fn calculate(&self, data: &[f64]) -> Vec<f64>;

    /// Number of values needed before the first defined output.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;
}

/// Batch indicator that uses whole bars (not just close).
pub trait BarIndicator: Send + Sync {
    /// The output type of the indicator.
    type Output;

    /// Calculate one output per input bar.
    fn calculate_bars(&self, bars: &[Bar]) -> Vec<Self::Output>;

    /// Number of bars needed before the first defined output.
    fn warmup(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;
}

/// Streaming indicator that maintains internal state.
///
/// Unlike batch indicators, streaming indicators are updated incrementally
/// with one input at a time, in order.
pub trait StreamingIndicator: Send + Sync {
    /// What the indicator consumes per step.
    type Input;
    /// The output type of the indicator.
    type Output;

    /// Update the indicator with a new input.
    ///
    /// Returns the current value, or None if not yet ready.
    fn update(&mut self, input: Self::Input) -> Option<Self::Output>;

    /// Get the current value without adding new data.
    fn current(&self) -> Option<Self::Output>;

    /// Reset the indicator state.
    fn reset(&mut self);

    /// Check if the indicator has enough data to produce values.
    fn is_ready(&self) -> bool;

    /// Get the minimum data points required.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;
}

/// Boxed scalar smoother, as selected at construction time.
pub type BoxedSmoother = Box<dyn StreamingIndicator<Input = f64, Output = f64>>;

#[cfg(test)]
mod tests {
    use super::*;

    struct RunningSum {
        period: usize,
        seen: usize,
        sum: f64,
    }

    impl StreamingIndicator for RunningSum {
        type Input = f64;
        type Output = f64;

        fn update(&mut self, input: f64) -> Option<f64> {
            self.seen += 1;
            self.sum += input;
            self.current()
        }

        fn current(&self) -> Option<f64> {
            self.is_ready().then_some(self.sum)
        }

        fn reset(&mut self) {
            self.seen = 0;
            self.sum = 0.0;
        }

        fn is_ready(&self) -> bool {
            self.seen >= self.period
        }

        fn period(&self) -> usize {
            self.period
        }

        fn name(&self) -> &str {
            "running_sum"
        }
    }

    #[test]
    fn test_streaming_through_box() {
        let mut boxed: BoxedSmoother = Box::new(RunningSum {
            period: 2,
            seen: 0,
            sum: 0.0,
        });

        assert!(boxed.update(1.0).is_none());
        assert_eq!(boxed.update(2.0), Some(3.0));

        boxed.reset();
        assert!(!boxed.is_ready());
        assert!(boxed.current().is_none());
    }
}
