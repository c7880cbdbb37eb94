//! Configuration structures.

use crate::ConfigError;
use serde::{Deserialize, Serialize};
use supertrend_indicators::{Smoothing, SupertrendParams};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub indicator: IndicatorSettings,
    #[serde(default)]
    pub scan: ScanSettings,
}

impl AppConfig {
    /// Check values that deserialize fine but cannot be used.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.indicator
            .params()
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("indicator: {}", e)))?;

        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::Invalid(format!(
                "logging.format must be \"pretty\" or \"json\", got {:?}",
                self.logging.format
            )));
        }

        if self.scan.strategy.trim().is_empty() {
            return Err(ConfigError::Invalid("scan.strategy is empty".into()));
        }
        Ok(())
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "supertrend".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    /// "pretty" or "json"
    pub format: String,
    /// Also write logs to this file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

/// Default Supertrend parameters for `trace`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSettings {
    pub atr_period: usize,
    pub factor: f64,
    #[serde(default)]
    pub smoothing: Smoothing,
}

impl IndicatorSettings {
    pub fn params(&self) -> SupertrendParams {
        SupertrendParams::new(self.atr_period, self.factor).with_smoothing(self.smoothing)
    }
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        let params = SupertrendParams::default();
        Self {
            atr_period: params.atr_period,
            factor: params.factor,
            smoothing: params.smoothing,
        }
    }
}

/// Defaults for `scan`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSettings {
    /// CSV file or directory of `<SYMBOL>.csv` files
    pub data: String,
    /// Registry key of the strategy to run
    pub strategy: String,
    /// Symbols to scan (empty = every file in `data`)
    #[serde(default)]
    pub symbols: Vec<String>,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            data: "data".to_string(),
            strategy: "supertrend_flip".to_string(),
            symbols: vec![],
        }
    }
}
