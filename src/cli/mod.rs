//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use supertrend_indicators::Smoothing;

#[derive(Parser)]
#[command(name = "supertrend")]
#[command(author, version, about = "Supertrend trend-band engine and signal scanner")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", env = "SUPERTREND_CONFIG")]
    pub config: PathBuf,

    /// Log level (overrides [logging] level)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the bar-by-bar Supertrend for one CSV file
    Trace(TraceArgs),
    /// Run a strategy over many symbols and report its signals
    Scan(ScanArgs),
    /// List available strategies
    Strategies,
    /// Validate configuration
    ValidateConfig,
    /// Print the default configuration as TOML
    InitConfig(InitConfigArgs),
}

#[derive(clap::Args)]
pub struct TraceArgs {
    /// Data file (CSV)
    #[arg(short, long)]
    pub data: PathBuf,

    /// Label for the report (defaults to the file name)
    #[arg(long)]
    pub symbol: Option<String>,

    /// ATR period (defaults to [indicator] atr_period)
    #[arg(short, long)]
    pub period: Option<usize>,

    /// Band multiplier (defaults to [indicator] factor)
    #[arg(short, long)]
    pub factor: Option<f64>,

    /// ATR smoothing: wilder (rma) or simple (sma)
    #[arg(long)]
    pub smoothing: Option<Smoothing>,

    /// Only print the last N rows in text output
    #[arg(long)]
    pub tail: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Save results to file (CSV if the extension is .csv, JSON otherwise)
    #[arg(long)]
    pub save: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct ScanArgs {
    /// CSV file or directory of <SYMBOL>.csv files (defaults to [scan] data)
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    /// Symbols to scan, comma-separated (defaults to every file found)
    #[arg(short = 'S', long, value_delimiter = ',')]
    pub symbols: Vec<String>,

    /// Strategy to run (defaults to [scan] strategy)
    #[arg(short, long)]
    pub strategy: Option<String>,

    /// Strategy configuration file (JSON, merged over the defaults)
    #[arg(long)]
    pub strategy_config: Option<PathBuf>,

    /// Output format (csv is treated as json)
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Save results to file (JSON)
    #[arg(long)]
    pub save: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct InitConfigArgs {
    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_trace() {
        let cli = Cli::try_parse_from([
            "supertrend", "-l", "debug", "trace", "--data", "spy.csv", "--period", "7",
            "--smoothing", "sma", "-o", "json",
        ])
        .unwrap();

        assert!(matches!(cli.log_level, Some(LogLevel::Debug)));
        match cli.command {
            Commands::Trace(args) => {
                assert_eq!(args.period, Some(7));
                assert_eq!(args.smoothing, Some(Smoothing::Simple));
                assert!(args.output == OutputFormat::Json);
                assert!(args.factor.is_none());
            }
            _ => panic!("expected trace"),
        }
    }

    #[test]
    fn test_parse_scan_symbols() {
        let cli = Cli::try_parse_from([
            "supertrend", "scan", "-S", "AAPL,MSFT", "--strategy", "triple_confirmation",
        ])
        .unwrap();

        match cli.command {
            Commands::Scan(args) => {
                assert_eq!(args.symbols, vec!["AAPL", "MSFT"]);
                assert_eq!(args.strategy.as_deref(), Some("triple_confirmation"));
                assert!(args.data.is_none());
            }
            _ => panic!("expected scan"),
        }
    }

    #[test]
    fn test_rejects_bad_smoothing() {
        let result = Cli::try_parse_from(["supertrend", "trace", "--data", "x.csv", "--smoothing", "ema"]);
        assert!(result.is_err());
    }
}
