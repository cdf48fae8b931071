//! # Mediator Configuration
//!
//! Runtime options for a [`Mediator`](crate::Mediator). Everything has a default, so
//! `MediatorConfig::default()` gives the reference behaviour: notification handlers
//! run in order and the first failure stops the broadcast.
//!
//! The struct is `serde`-deserializable so applications can embed it in their own
//! configuration files.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What `publish` does when a notification handler fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishStrategy {
    /// Stop at the first failing handler; later handlers are not invoked.
    #[default]
    StopOnFirstError,
    /// Invoke every handler, then report all failures together.
    ContinueOnError,
}

impl fmt::Display for PublishStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishStrategy::StopOnFirstError => f.write_str("stop_on_first_error"),
            PublishStrategy::ContinueOnError => f.write_str("continue_on_error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown publish strategy: {0}")]
pub struct ParseStrategyError(String);

impl FromStr for PublishStrategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "stop_on_first_error" | "stop" => Ok(PublishStrategy::StopOnFirstError),
            "continue_on_error" | "continue" => Ok(PublishStrategy::ContinueOnError),
            _ => Err(ParseStrategyError(s.to_string())),
        }
    }
}

/// Options applied with [`Mediator::with_config`](crate::Mediator::with_config).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediatorConfig {
    pub publish_strategy: PublishStrategy,
    /// Wrap every `send`/`publish` in an `info` span named after the message type.
    pub instrument: bool,
}

impl Default for MediatorConfig {
    fn default() -> Self {
        Self {
            publish_strategy: PublishStrategy::default(),
            instrument: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_strategy_names() {
        assert_eq!(
            "continue".parse::<PublishStrategy>().unwrap(),
            PublishStrategy::ContinueOnError
        );
        assert_eq!(
            "Stop-On-First-Error".parse::<PublishStrategy>().unwrap(),
            PublishStrategy::StopOnFirstError
        );
        assert!("sometimes".parse::<PublishStrategy>().is_err());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: MediatorConfig =
            serde_json::from_str(r#"{ "publish_strategy": "continue_on_error" }"#).unwrap();
        assert_eq!(config.publish_strategy, PublishStrategy::ContinueOnError);
        assert!(config.instrument);

        let config: MediatorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, MediatorConfig::default());
    }
}
