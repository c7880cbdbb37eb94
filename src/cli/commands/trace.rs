//! Trace command: the bar-by-bar Supertrend of one CSV file.

use anyhow::{bail, Context, Result};
use supertrend_config::AppConfig;
use supertrend_core::traits::BarIndicator;
use supertrend_indicators::{Supertrend, SupertrendParams};
use supertrend_monitor::TraceReport;
use tracing::{info, warn};

use crate::cli::{OutputFormat, TraceArgs};

/// Command-line values win over the `[indicator]` section.
fn resolve_params(args: &TraceArgs, config: &AppConfig) -> SupertrendParams {
    let defaults = config.indicator.params();
    SupertrendParams::new(
        args.period.unwrap_or(defaults.atr_period),
        args.factor.unwrap_or(defaults.factor),
    )
    .with_smoothing(args.smoothing.unwrap_or(defaults.smoothing))
}

pub async fn run(args: TraceArgs, config: &AppConfig) -> Result<()> {
    if !args.data.is_file() {
        bail!(
            "Data file '{}' does not exist. Provide a CSV file with --data",
            args.data.display()
        );
    }

    let params = resolve_params(&args, config);
    let engine = Supertrend::new(params).context("Invalid Supertrend parameters")?;

    let bars = supertrend_data::load_csv(&args.data)
        .await
        .with_context(|| format!("Failed to load {}", args.data.display()))?;
    if bars.len() < params.atr_period {
        warn!(
            bars = bars.len(),
            period = params.atr_period,
            "fewer bars than the ATR period; every value stays undefined"
        );
    }

    let symbol = args.symbol.clone().unwrap_or_else(|| {
        args.data
            .file_stem()
            .map(|s| s.to_string_lossy().to_uppercase())
            .unwrap_or_else(|| "DATA".to_string())
    });

    info!(
        symbol = %symbol,
        bars = bars.len(),
        period = params.atr_period,
        factor = params.factor,
        smoothing = %params.smoothing,
        "Running Supertrend trace"
    );

    let outputs = engine.calculate_bars(&bars);
    let report = TraceReport::new(symbol, params, &bars, &outputs);

    // Output results
    match args.output {
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Csv => print!("{}", report.to_csv()),
        OutputFormat::Text => println!("{}", report.summary(args.tail)),
    }

    // Save if requested
    if let Some(save_path) = &args.save {
        let is_csv = save_path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        let contents = if is_csv {
            report.to_csv()
        } else {
            report.to_json()?
        };
        tokio::fs::write(save_path, contents)
            .await
            .with_context(|| format!("Failed to write {}", save_path.display()))?;
        info!("Results saved to {:?}", save_path);
    }

    Ok(())
}
