//! Data source trait definitions.

use crate::error::DataError;
use crate::types::Bar;
use async_trait::async_trait;

/// Trait for historical bar sources.
///
/// Implementations return bars ordered from oldest to newest. Consumers
/// trust that ordering; gaps and out-of-order bars are not re-checked
/// downstream.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Load every available bar for `symbol`.
    async fn load_bars(&self, symbol: &str) -> Result<Vec<Bar>, DataError>;

    /// Symbols this source can serve.
    fn symbols(&self) -> Vec<String>;

    /// Get the data source name.
    fn name(&self) -> &str;
}
