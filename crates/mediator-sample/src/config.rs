//! # Catalog Configuration
//!
//! Defaults, overridable from the environment:
//!
//! | Variable | Field | Default |
//! |----------|-------|---------|
//! | `CATALOG_MAX_NAME_LEN` | `max_name_len` | `64` |
//! | `CATALOG_PUBLISH_STRATEGY` | `publish_strategy` | `stop_on_first_error` |
//!
//! The struct also deserializes with `serde`, so it can live in a config file.

use mediator_framework::config::ParseStrategyError;
use mediator_framework::{MediatorConfig, PublishStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MAX_NAME_LEN_VAR: &str = "CATALOG_MAX_NAME_LEN";
pub const PUBLISH_STRATEGY_VAR: &str = "CATALOG_PUBLISH_STRATEGY";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub max_name_len: usize,
    pub publish_strategy: PublishStrategy,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            max_name_len: 64,
            publish_strategy: PublishStrategy::default(),
        }
    }
}

/// Errors raised while reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },

    #[error("{var}: {source}")]
    InvalidStrategy {
        var: &'static str,
        source: ParseStrategyError,
    },
}

impl CatalogConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(MAX_NAME_LEN_VAR) {
            config.max_name_len = match value.trim().parse::<usize>() {
                Ok(len) if len > 0 => len,
                _ => {
                    return Err(ConfigError::InvalidNumber {
                        var: MAX_NAME_LEN_VAR,
                        value,
                    })
                }
            };
        }

        if let Some(value) = lookup(PUBLISH_STRATEGY_VAR) {
            config.publish_strategy =
                value
                    .parse()
                    .map_err(|source| ConfigError::InvalidStrategy {
                        var: PUBLISH_STRATEGY_VAR,
                        source,
                    })?;
        }

        Ok(config)
    }

    pub fn mediator_config(&self) -> MediatorConfig {
        MediatorConfig {
            publish_strategy: self.publish_strategy,
            ..MediatorConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn no_overrides_gives_defaults() {
        let config = CatalogConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, CatalogConfig::default());
    }

    #[test]
    fn overrides_are_applied() {
        let config = CatalogConfig::from_lookup(lookup(&[
            (MAX_NAME_LEN_VAR, " 12 "),
            (PUBLISH_STRATEGY_VAR, "continue"),
        ]))
        .unwrap();
        assert_eq!(config.max_name_len, 12);
        assert_eq!(
            config.mediator_config().publish_strategy,
            PublishStrategy::ContinueOnError
        );
    }

    #[test]
    fn bad_values_are_reported_with_the_variable_name() {
        let err = CatalogConfig::from_lookup(lookup(&[(MAX_NAME_LEN_VAR, "0")])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "CATALOG_MAX_NAME_LEN must be a positive integer, got '0'"
        );

        let err =
            CatalogConfig::from_lookup(lookup(&[(PUBLISH_STRATEGY_VAR, "maybe")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidStrategy { .. }));
    }

    #[test]
    fn deserializes_with_missing_fields() {
        let config: CatalogConfig = serde_json::from_str(r#"{ "max_name_len": 8 }"#).unwrap();
        assert_eq!(config.max_name_len, 8);
        assert_eq!(config.publish_strategy, PublishStrategy::StopOnFirstError);
    }
}
