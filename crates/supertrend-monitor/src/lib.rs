//! Logging setup and human/JSON reports for traces and scans.

mod logging;
mod report;

pub use logging::setup_logging;
pub use report::{ScanReport, SymbolScan, TraceReport, TraceRow, TraceSummary};
