//! CSV data source.
//!
//! A source points at either one CSV file (one symbol, named after the file
//! stem) or a directory of `<SYMBOL>.csv` files.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use supertrend_core::error::DataError;
use supertrend_core::traits::DataSource;
use supertrend_core::types::Bar;
use tracing::{debug, warn};

/// CSV record format.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "date", alias = "timestamp", alias = "Timestamp", alias = "time")]
    date: String,
    #[serde(alias = "Open", alias = "open")]
    open: f64,
    #[serde(alias = "High", alias = "high")]
    high: f64,
    #[serde(alias = "Low", alias = "low")]
    low: f64,
    #[serde(alias = "Close", alias = "close", alias = "Adj Close")]
    close: f64,
    #[serde(alias = "Volume", alias = "volume", default)]
    volume: f64,
}

/// Parse bars from CSV text, sorted by timestamp.
///
/// Rows with non-finite prices or `high < low` are rejected with the
/// 1-based data row number.
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<Bar>, DataError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut bars = Vec::new();

    for (index, result) in reader.deserialize().enumerate() {
        let row = index + 1;
        let record: CsvRecord = result.map_err(|e| DataError::ParseError(e.to_string()))?;
        let timestamp = parse_timestamp(&record.date)?;

        let bar = Bar::new(
            timestamp,
            record.open,
            record.high,
            record.low,
            record.close,
            record.volume,
        );
        bar.validate()
            .map_err(|reason| DataError::InvalidBar { row, reason })?;
        bars.push(bar);
    }

    // Sort by timestamp
    bars.sort_by_key(|b| b.timestamp);

    Ok(bars)
}

/// Parse various timestamp formats into Unix milliseconds.
fn parse_timestamp(date_str: &str) -> Result<i64, DataError> {
    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
    ];
    for format in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Ok(dt.and_utc().timestamp_millis());
        }
    }

    let date_formats = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];
    for format in date_formats {
        if let Some(dt) = NaiveDate::parse_from_str(date_str, format)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
        {
            return Ok(dt.and_utc().timestamp_millis());
        }
    }

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(date_str) {
        return Ok(dt.timestamp_millis());
    }

    // Unix timestamp: milliseconds if > 10 digits, else seconds
    if let Ok(ts) = date_str.parse::<i64>() {
        return Ok(if ts > 10_000_000_000 { ts } else { ts * 1000 });
    }

    Err(DataError::ParseError(format!(
        "Could not parse date: {}",
        date_str
    )))
}

/// CSV data source for historical bars.
#[derive(Debug, Clone)]
pub struct CsvDataSource {
    root: PathBuf,
    single_file: bool,
}

impl CsvDataSource {
    /// Create a source over a CSV file or a directory of CSV files.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let root = path.as_ref().to_path_buf();
        if !root.exists() {
            return Err(DataError::NoDataAvailable(root.display().to_string()));
        }
        Ok(Self {
            single_file: root.is_file(),
            root,
        })
    }

    /// Read and parse one CSV file.
    pub async fn load_file(path: &Path) -> Result<Vec<Bar>, DataError> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DataError::NoDataAvailable(path.display().to_string())
            } else {
                DataError::Io(e)
            }
        })?;
        let bars = parse_csv(bytes.as_slice())?;
        debug!(path = %path.display(), bars = bars.len(), "loaded csv");
        Ok(bars)
    }

    fn path_for(&self, symbol: &str) -> Result<PathBuf, DataError> {
        if self.single_file {
            let matches = symbol_of(&self.root).is_some_and(|s| s.eq_ignore_ascii_case(symbol));
            return if matches {
                Ok(self.root.clone())
            } else {
                Err(DataError::SymbolNotFound(symbol.to_string()))
            };
        }

        self.csv_files()
            .into_iter()
            .find(|p| symbol_of(p).is_some_and(|s| s.eq_ignore_ascii_case(symbol)))
            .ok_or_else(|| DataError::SymbolNotFound(symbol.to_string()))
    }

    fn csv_files(&self) -> Vec<PathBuf> {
        if self.single_file {
            return vec![self.root.clone()];
        }
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = %self.root.display(), error = %e, "cannot list data directory");
                return vec![];
            }
        };
        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| {
                p.is_file()
                    && p.extension()
                        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
            })
            .collect();
        files.sort();
        files
    }
}

fn symbol_of(path: &Path) -> Option<String> {
    path.file_stem().map(|s| s.to_string_lossy().to_uppercase())
}

#[async_trait]
impl DataSource for CsvDataSource {
    async fn load_bars(&self, symbol: &str) -> Result<Vec<Bar>, DataError> {
        let path = self.path_for(symbol)?;
        Self::load_file(&path).await
    }

    fn symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self.csv_files().iter().filter_map(|p| symbol_of(p)).collect();
        symbols.sort();
        symbols
    }

    fn name(&self) -> &str {
        "CSV"
    }
}
