//! generator2mqtt Common Library
//!
//! This crate provides shared types and utilities for MQTT bridges:
//!
//! - [`config`] - MQTT and logging configuration sections
//! - [`session`] - MQTT client construction with a last will
//! - [`topics`] - Topic builders and validation
//! - [`discovery`] - Home Assistant discovery documents
//! - [`error`] - Error types

pub mod config;
pub mod discovery;
pub mod error;
pub mod session;
pub mod topics;

// Re-export commonly used types at the crate root
pub use config::{LogFormat, LoggingConfig, MqttConfig};
pub use discovery::{DiscoveryDevice, SensorDiscovery};
pub use error::{Error, Result};
pub use session::{connect, mqtt_options};
pub use topics::{
    AVAILABILITY_OFFLINE, AVAILABILITY_ONLINE, DISCOVERY_PREFIX, TopicBuilder, discovery_topic,
    validate_publish_topic,
};

/// Initialize tracing with the given configuration.
///
/// Supports two output formats:
/// - `LogFormat::Text` (default): Human-readable text format
/// - `LogFormat::Json`: Structured JSON format for log aggregation systems
///
/// `RUST_LOG` takes precedence over the configured level when set.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format {
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(fmt::layer())
                .with(filter)
                .try_init()
                .map_err(|e| Error::Config(format!("Failed to initialize tracing: {}", e)))?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(fmt::layer().json())
                .with(filter)
                .try_init()
                .map_err(|e| Error::Config(format!("Failed to initialize tracing: {}", e)))?;
        }
    }

    Ok(())
}
