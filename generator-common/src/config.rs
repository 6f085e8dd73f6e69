use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Error, Result};

/// Smallest keep-alive the MQTT client accepts.
pub const MIN_KEEP_ALIVE_SECS: u64 = 5;

/// MQTT broker connection configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MqttConfig {
    /// Broker host name or address.
    #[serde(default = "default_host")]
    pub host: String,

    /// Broker TCP port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Client identifier presented to the broker.
    #[serde(default = "default_client_id")]
    pub client_id: String,

    /// Keep-alive interval in seconds.
    #[serde(default = "default_keep_alive_secs")]
    pub keep_alive_secs: u64,

    /// Optional username (requires `password`).
    #[serde(default)]
    pub username: Option<String>,

    /// Optional password (requires `username`).
    #[serde(default)]
    pub password: Option<String>,

    /// Number of requests buffered between the client handle and the event loop.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,

    /// Delay before polling the event loop again after a connection error.
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,
}

fn default_host() -> String {
    "debian.lan".to_string()
}

fn default_port() -> u16 {
    1883
}

fn default_client_id() -> String {
    "generator2mqtt".to_string()
}

fn default_keep_alive_secs() -> u64 {
    30
}

fn default_channel_capacity() -> usize {
    64
}

fn default_reconnect_delay_ms() -> u64 {
    5000
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            client_id: default_client_id(),
            keep_alive_secs: default_keep_alive_secs(),
            username: None,
            password: None,
            channel_capacity: default_channel_capacity(),
            reconnect_delay_ms: default_reconnect_delay_ms(),
        }
    }
}

impl MqttConfig {
    /// Keep-alive as a [`Duration`].
    pub fn keep_alive(&self) -> Duration {
        Duration::from_secs(self.keep_alive_secs)
    }

    /// Reconnect delay as a [`Duration`].
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }

    /// Validate connection settings.
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(Error::Config("MQTT host must not be empty".to_string()));
        }
        if self.client_id.trim().is_empty() {
            return Err(Error::Config(
                "MQTT client_id must not be empty".to_string(),
            ));
        }
        if self.keep_alive_secs < MIN_KEEP_ALIVE_SECS {
            return Err(Error::Config(format!(
                "MQTT keep_alive_secs must be at least {}",
                MIN_KEEP_ALIVE_SECS
            )));
        }
        if self.channel_capacity == 0 {
            return Err(Error::Config(
                "MQTT channel_capacity must be greater than zero".to_string(),
            ));
        }
        if self.username.is_some() != self.password.is_some() {
            return Err(Error::Config(
                "MQTT username and password must be set together".to_string(),
            ));
        }
        Ok(())
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text format (default).
    #[default]
    Text,
    /// Structured JSON format.
    Json,
}

/// Common logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format: "text" or "json".
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}
