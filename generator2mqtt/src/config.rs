//! Configuration for the generator bridge.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use generator_bridge_framework::{BridgeConfig, BridgeError, LoggingConfig, MqttConfig};

use crate::device::BRIDGE_PREFIX;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid MQTT settings: {0}")]
    Mqtt(#[from] generator_common::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Complete bridge configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratorBridgeConfig {
    /// MQTT connection settings
    #[serde(default)]
    pub mqtt: MqttConfig,

    /// Publish loop settings
    #[serde(default)]
    pub bridge: BridgeSettings,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Publish loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeSettings {
    /// Interval between periodic re-evaluations, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_poll_interval_ms() -> u64 {
    1000
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl BridgeSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl GeneratorBridgeConfig {
    /// Validate the configuration.
    pub fn validate_config(&self) -> Result<(), ConfigError> {
        self.mqtt.validate()?;

        if self.bridge.poll_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "bridge.poll_interval_ms must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

impl BridgeConfig for GeneratorBridgeConfig {
    fn mqtt(&self) -> &MqttConfig {
        &self.mqtt
    }

    fn logging(&self) -> &LoggingConfig {
        &self.logging
    }

    fn topic_prefix(&self) -> &str {
        BRIDGE_PREFIX
    }

    fn validate(&self) -> generator_bridge_framework::Result<()> {
        self.validate_config()
            .map_err(|e| BridgeError::validation(e.to_string()))
    }
}
