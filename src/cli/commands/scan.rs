//! Scan command: run one strategy over many symbols in parallel.

use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use supertrend_config::AppConfig;
use supertrend_core::traits::DataSource;
use supertrend_core::types::{Bar, BarSeries};
use supertrend_data::CsvDataSource;
use supertrend_monitor::{ScanReport, SymbolScan};
use supertrend_strategies::StrategyRegistry;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::cli::{OutputFormat, ScanArgs};

/// Bars kept in each symbol's rolling series.
const SERIES_CAPACITY: usize = 1024;

/// Replay `bars` through a fresh strategy instance.
fn run_strategy(
    strategy: &str,
    config: serde_json::Value,
    symbol: String,
    bars: Vec<Bar>,
) -> SymbolScan {
    let registry = StrategyRegistry::new();
    let mut strategy = match registry.create(strategy, config, vec![symbol.clone()]) {
        Ok(strategy) => strategy,
        Err(e) => return SymbolScan::failed(symbol, e),
    };

    let mut series = BarSeries::with_capacity(symbol.clone(), SERIES_CAPACITY);
    let mut signals = Vec::new();
    for bar in &bars {
        series.push(*bar);
        if let Some(signal) = strategy.on_bar(&series) {
            signals.push(signal);
        }
    }

    SymbolScan {
        symbol,
        bars: bars.len(),
        signals,
        error: None,
    }
}

async fn load_strategy_config(path: Option<&PathBuf>) -> Result<serde_json::Value> {
    match path {
        Some(path) => {
            let text = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("Invalid strategy config in {}", path.display()))
        }
        None => Ok(serde_json::Value::Null),
    }
}

pub async fn run(args: ScanArgs, config: &AppConfig) -> Result<()> {
    let strategy = args
        .strategy
        .clone()
        .unwrap_or_else(|| config.scan.strategy.clone());
    let strategy_config = load_strategy_config(args.strategy_config.as_ref()).await?;

    // Fail fast on a bad strategy name or config, before touching any data
    let registry = StrategyRegistry::new();
    registry
        .create(&strategy, strategy_config.clone(), vec!["CHECK".to_string()])
        .with_context(|| format!("Failed to create strategy '{}'", strategy))?;

    let data_path = args
        .data
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.scan.data));
    let source = Arc::new(CsvDataSource::new(&data_path).with_context(|| {
        format!(
            "Data path '{}' does not exist. Provide a CSV file or directory with --data",
            data_path.display()
        )
    })?);

    let symbols: Vec<String> = if !args.symbols.is_empty() {
        args.symbols.clone()
    } else if !config.scan.symbols.is_empty() {
        config.scan.symbols.clone()
    } else {
        source.symbols()
    };
    if symbols.is_empty() {
        bail!("No symbols to scan in {}", data_path.display());
    }

    info!(
        strategy = %strategy,
        symbols = symbols.len(),
        source = source.name(),
        "Starting scan"
    );

    let mut tasks = JoinSet::new();
    for symbol in symbols {
        let source = Arc::clone(&source);
        let strategy = strategy.clone();
        let strategy_config = strategy_config.clone();

        tasks.spawn(async move {
            let bars = match source.load_bars(&symbol).await {
                Ok(bars) => bars,
                Err(e) => {
                    warn!(symbol = %symbol, error = %e, "skipping symbol");
                    return SymbolScan::failed(symbol, e);
                }
            };
            let label = symbol.clone();
            match tokio::task::spawn_blocking(move || {
                run_strategy(&strategy, strategy_config, symbol, bars)
            })
            .await
            {
                Ok(result) => result,
                Err(e) => SymbolScan::failed(label, e),
            }
        });
    }

    let mut results = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(result) => results.push(result),
            Err(e) => error!(error = %e, "scan task failed"),
        }
    }
    results.sort_by(|a, b| a.symbol.cmp(&b.symbol));

    let report = ScanReport { strategy, results };
    info!(
        symbols = report.results.len(),
        signals = report.total_signals(),
        "Scan complete"
    );

    // Output results
    match args.output {
        OutputFormat::Text => println!("{}", report.summary()),
        OutputFormat::Json | OutputFormat::Csv => println!("{}", report.to_json()?),
    }

    // Save if requested
    if let Some(save_path) = &args.save {
        tokio::fs::write(save_path, report.to_json()?)
            .await
            .with_context(|| format!("Failed to write {}", save_path.display()))?;
        info!("Results saved to {:?}", save_path);
    }

    Ok(())
}
