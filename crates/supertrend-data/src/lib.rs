//! Bar data sources for the Supertrend engine.

mod csv_source;

pub use csv_source::{parse_csv, CsvDataSource};

use std::path::Path;
use supertrend_core::error::DataError;
use supertrend_core::types::Bar;

/// Load bars from a single CSV file.
pub async fn load_csv(path: impl AsRef<Path>) -> Result<Vec<Bar>, DataError> {
    CsvDataSource::load_file(path.as_ref()).await
}
