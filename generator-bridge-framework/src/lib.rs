//! generator2mqtt Bridge Framework
//!
//! Common abstractions for building bridges that republish MQTT telemetry.
//!
//! # Overview
//!
//! This framework provides:
//! - [`BridgeConfig`] trait for configuration loading and validation
//! - [`BridgeRunner`] for managing bridge lifecycle (connect, subscribe, shutdown)
//! - [`Publisher`] for publishing to MQTT, behind the [`MessageSink`] seam
//! - [`BridgeArgs`] for common CLI argument parsing
//! - [`BridgeStatus`] for availability reporting
//!
//! # Example
//!
//! ```ignore
//! use generator_bridge_framework::{BridgeArgs, BridgeConfig, BridgeRunner};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = BridgeArgs::parse_with_default("mybridge.json5");
//!     let config = MyBridgeConfig::load(&args.config)?;
//!
//!     let mut runner = BridgeRunner::new_with_args("mybridge", config, Some(&args))?;
//!     let inbound = runner.subscribe(["sensors/+/value"])?;
//!
//!     // Spawn bridge-specific workers
//!     runner.spawn(my_worker(inbound, runner.publisher()));
//!
//!     // Run until Ctrl+C
//!     runner.run().await
//! }
//! ```

mod args;
mod config;
mod error;
mod inbound;
mod publisher;
mod runner;
mod status;

pub use args::BridgeArgs;
pub use config::BridgeConfig;
pub use error::{BridgeError, Result};
pub use inbound::InboundMessage;
pub use publisher::{MessageSink, PublishStats, Publisher};
pub use runner::BridgeRunner;
pub use status::{BridgeStatus, StatusPublisher};

// Re-export commonly used types from generator-common
pub use generator_common::{
    DiscoveryDevice, LogFormat, LoggingConfig, MqttConfig, SensorDiscovery, TopicBuilder,
};
