//! Configuration management.
//!
//! Settings come from a TOML file layered under `SUPERTREND__*`
//! environment variables, e.g. `SUPERTREND__INDICATOR__FACTOR=2.5`.

mod settings;

pub use settings::{AppConfig, AppSettings, IndicatorSettings, LoggingConfig, ScanSettings};

use config::{Config, Environment, File, FileFormat};
use std::path::Path;
use thiserror::Error;

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Could not render configuration: {0}")]
    Render(#[from] toml::ser::Error),
}

fn build(path: &Path, required: bool) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).format(FileFormat::Toml).required(required))
        .add_source(
            Environment::with_prefix("SUPERTREND")
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("scan.symbols")
                .try_parsing(true),
        )
        .build()?;

    let config: AppConfig = config.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

/// Load configuration from file and environment. The file must exist.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    build(path, true)
}

/// Like [`load_config`], but a missing file means built-in defaults.
pub fn load_config_or_default(path: &Path) -> Result<AppConfig, ConfigError> {
    build(path, false)
}

/// Render the built-in defaults as TOML.
pub fn default_toml() -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(&AppConfig::default())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "supertrend-config-{}-{}.toml",
            name,
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_missing_file() {
        let path = Path::new("/definitely/not/here.toml");

        assert!(load_config(path).is_err());

        let config = load_config_or_default(path).unwrap();
        assert_eq!(config.indicator.atr_period, 10);
    }

    #[test]
    fn test_load_partial_file() {
        let path = write_temp(
            "partial",
            "[indicator]\natr_period = 14\nfactor = 2.5\nsmoothing = \"simple\"\n",
        );
        let config = load_config(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.indicator.atr_period, 14);
        assert_eq!(config.indicator.factor, 2.5);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.scan.strategy, "supertrend_flip");
    }

    #[test]
    fn test_invalid_values_rejected() {
        let path = write_temp("invalid", "[indicator]\natr_period = 10\nfactor = 0.0\n");
        let result = load_config(&path);
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_default_toml_round_trips() {
        let rendered = default_toml().unwrap();
        assert!(rendered.contains("[indicator]"));

        let path = write_temp("defaults", &rendered);
        let config = load_config(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.indicator, AppConfig::default().indicator);
    }
}
