//! Validate configuration command.

use anyhow::Result;
use std::path::Path;
use supertrend_config::load_config;

pub async fn run(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    match load_config(config_path) {
        Ok(config) => {
            println!("Configuration is valid!");
            println!();
            println!("App: {}", config.app.name);
            println!("Environment: {}", config.app.environment);
            println!("Log level: {} ({})", config.logging.level, config.logging.format);
            if let Some(file) = &config.logging.file {
                println!("Log file: {}", file);
            }
            println!(
                "Indicator: period {}, factor {}, {} smoothing",
                config.indicator.atr_period, config.indicator.factor, config.indicator.smoothing
            );
            println!("Scan data: {}", config.scan.data);
            println!("Scan strategy: {}", config.scan.strategy);
            if !config.scan.symbols.is_empty() {
                println!("Scan symbols: {}", config.scan.symbols.join(", "));
            }
        }
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
