//! Supertrend CLI application.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;
use supertrend_config::{load_config_or_default, LoggingConfig};
use supertrend_monitor::setup_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logging settings come from the config file when it loads; a broken
    // file is reported by the command itself.
    let loaded = load_config_or_default(&cli.config);
    let logging = loaded
        .as_ref()
        .map(|c| c.logging.clone())
        .unwrap_or_else(|_| LoggingConfig::default());

    let level = cli
        .log_level
        .map(|l| l.as_str().to_string())
        .unwrap_or(logging.level);
    let json = cli.json_logs || logging.format == "json";
    let _guard = setup_logging(&level, json, logging.file.as_deref().map(Path::new))
        .context("Failed to set up logging")?;

    // Execute command
    match cli.command {
        Commands::ValidateConfig => cli::commands::validate::run(&cli.config).await,
        Commands::InitConfig(args) => cli::commands::init_config::run(args).await,
        Commands::Strategies => cli::commands::strategies::run().await,
        Commands::Trace(args) => {
            let config = loaded.context("Failed to load configuration")?;
            cli::commands::trace::run(args, &config).await
        }
        Commands::Scan(args) => {
            let config = loaded.context("Failed to load configuration")?;
            cli::commands::scan::run(args, &config).await
        }
    }
}
