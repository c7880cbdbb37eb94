//! Strategy registry for building strategies by name.

use crate::{
    SupertrendFlipConfig, SupertrendFlipStrategy, TripleConfirmationConfig,
    TripleConfirmationStrategy,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::BTreeMap;
use supertrend_core::{error::StrategyError, traits::Strategy, traits::StrategyConfig};

/// Information about a registered strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyInfo {
    /// Registry key
    pub key: String,
    /// Display name
    pub name: String,
    pub description: String,
    /// Default configuration as JSON
    pub default_config: serde_json::Value,
}

/// Registry of the built-in strategies.
pub struct StrategyRegistry {
    strategies: BTreeMap<String, StrategyInfo>,
}

impl StrategyRegistry {
    /// Create a registry with all built-in strategies.
    pub fn new() -> Self {
        let mut registry = Self {
            strategies: BTreeMap::new(),
        };

        registry.register(
            "supertrend_flip",
            "Supertrend Flip",
            "Buys on flips to uptrend and sells on flips to downtrend",
            &SupertrendFlipConfig::default(),
        );
        registry.register(
            "triple_confirmation",
            "Triple Confirmation",
            "Supertrend flips confirmed by a trailing Supertrend, a triple consensus, EMA/RMA and volume",
            &TripleConfirmationConfig::default(),
        );

        registry
    }

    fn register<C: Serialize>(&mut self, key: &str, name: &str, description: &str, defaults: &C) {
        // Default configs are plain structs; serialization cannot fail.
        let default_config = serde_json::to_value(defaults).unwrap_or(serde_json::Value::Null);
        self.strategies.insert(
            key.to_string(),
            StrategyInfo {
                key: key.to_string(),
                name: name.to_string(),
                description: description.to_string(),
                default_config,
            },
        );
    }

    /// List all available strategies, sorted by key.
    pub fn list(&self) -> Vec<&StrategyInfo> {
        self.strategies.values().collect()
    }

    /// Get strategy info by key.
    pub fn get(&self, key: &str) -> Option<&StrategyInfo> {
        self.strategies.get(key)
    }

    /// Check if a strategy exists.
    pub fn exists(&self, key: &str) -> bool {
        self.strategies.contains_key(key)
    }

    /// Get all strategy keys.
    pub fn names(&self) -> Vec<&String> {
        self.strategies.keys().collect()
    }

    /// Create a strategy instance from a JSON configuration.
    ///
    /// Keys missing from `config` fall back to the strategy's defaults.
    pub fn create(
        &self,
        key: &str,
        config: serde_json::Value,
        symbols: Vec<String>,
    ) -> Result<Box<dyn Strategy>, StrategyError> {
        let info = self
            .get(key)
            .ok_or_else(|| StrategyError::NotFound(key.to_string()))?;
        let merged = merge(info.default_config.clone(), config);

        match key {
            "supertrend_flip" => {
                let mut config: SupertrendFlipConfig = parse(merged)?;
                config.symbols = symbols;
                config.validate()?;
                Ok(Box::new(SupertrendFlipStrategy::new(config)?))
            }
            "triple_confirmation" => {
                let mut config: TripleConfirmationConfig = parse(merged)?;
                config.symbols = symbols;
                config.validate()?;
                Ok(Box::new(TripleConfirmationStrategy::new(config)?))
            }
            _ => Err(StrategyError::NotFound(key.to_string())),
        }
    }

    /// Create a strategy with default configuration.
    pub fn create_default(
        &self,
        key: &str,
        symbols: Vec<String>,
    ) -> Result<Box<dyn Strategy>, StrategyError> {
        self.create(key, serde_json::Value::Null, symbols)
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn parse<C: DeserializeOwned>(value: serde_json::Value) -> Result<C, StrategyError> {
    serde_json::from_value(value).map_err(|e| StrategyError::InvalidConfig(e.to_string()))
}

/// Overlay `overrides` onto `defaults`, recursing into nested objects.
/// Arrays and scalars are replaced whole.
fn merge(defaults: serde_json::Value, overrides: serde_json::Value) -> serde_json::Value {
    match (defaults, overrides) {
        (serde_json::Value::Object(mut base), serde_json::Value::Object(extra)) => {
            for (key, value) in extra {
                let merged = match base.remove(&key) {
                    Some(existing) => merge(existing, value),
                    None => value,
                };
                base.insert(key, merged);
            }
            serde_json::Value::Object(base)
        }
        (defaults, serde_json::Value::Null) => defaults,
        (_, overrides) => overrides,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_list() {
        let registry = StrategyRegistry::new();
        let keys: Vec<_> = registry.list().iter().map(|s| s.key.as_str()).collect();

        assert_eq!(keys, vec!["supertrend_flip", "triple_confirmation"]);
    }

    #[test]
    fn test_registry_get() {
        let registry = StrategyRegistry::new();

        assert!(registry.get("supertrend_flip").is_some());
        assert!(registry.exists("triple_confirmation"));
        assert!(registry.get("unknown").is_none());
    }

    #[test]
    fn test_default_config_is_json() {
        let registry = StrategyRegistry::new();
        let info = registry.get("triple_confirmation").unwrap();

        assert_eq!(info.default_config["main"]["atr_period"], 10);
        assert_eq!(info.default_config["trailing"]["factor"], 1.5);
        assert_eq!(info.default_config["bias"], "both");
    }

    #[test]
    fn test_create_default() {
        let registry = StrategyRegistry::new();

        let strategy = registry
            .create_default("supertrend_flip", vec!["AAPL".to_string()])
            .unwrap();
        assert_eq!(strategy.name(), "Supertrend Flip");
        assert_eq!(strategy.symbols(), &["AAPL".to_string()]);
        assert_eq!(strategy.warmup_period(), 10);
    }

    #[test]
    fn test_create_with_partial_config() {
        let registry = StrategyRegistry::new();
        let config = serde_json::json!({ "atr_period": 7, "smoothing": "simple" });

        let strategy = registry
            .create("supertrend_flip", config, vec!["GOOGL".to_string()])
            .unwrap();
        assert_eq!(strategy.warmup_period(), 7);
        assert_eq!(strategy.state().custom["smoothing"], "simple");
    }

    #[test]
    fn test_create_with_nested_override() {
        let registry = StrategyRegistry::new();
        let config = serde_json::json!({ "main": { "factor": 2.0 }, "take_profit": false });

        let merged = merge(
            registry.get("triple_confirmation").unwrap().default_config.clone(),
            config.clone(),
        );
        assert_eq!(merged["main"]["atr_period"], 10);
        assert_eq!(merged["main"]["factor"], 2.0);
        assert_eq!(merged["main"]["smoothing"], "wilder");
        assert_eq!(merged["take_profit"], false);
        assert_eq!(merged["confirmation"].as_array().unwrap().len(), 3);

        assert!(registry
            .create("triple_confirmation", config, vec!["AAPL".to_string()])
            .is_ok());
    }

    #[test]
    fn test_merge_replaces_arrays() {
        let merged = merge(
            serde_json::json!({ "confirmation": [1, 2, 3], "bias": "both" }),
            serde_json::json!({ "confirmation": [4] }),
        );
        assert_eq!(merged["confirmation"], serde_json::json!([4]));
        assert_eq!(merged["bias"], "both");
    }

    #[test]
    fn test_create_rejects_bad_config() {
        let registry = StrategyRegistry::new();

        let result = registry.create(
            "supertrend_flip",
            serde_json::json!({ "factor": 0.0 }),
            vec!["AAPL".to_string()],
        );
        assert!(result.is_err());

        let result = registry.create(
            "triple_confirmation",
            serde_json::json!({ "ma_period": "nine" }),
            vec!["AAPL".to_string()],
        );
        assert!(matches!(result, Err(StrategyError::InvalidConfig(_))));
    }

    #[test]
    fn test_create_unknown_strategy() {
        let registry = StrategyRegistry::new();

        let result = registry.create_default("unknown", vec!["AAPL".to_string()]);
        assert!(matches!(result, Err(StrategyError::NotFound(_))));
    }
}
