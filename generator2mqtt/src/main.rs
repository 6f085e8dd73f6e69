//! MQTT bridge deriving a generator's run state from smart-plug telemetry.

use anyhow::{Context, Result};
use generator_bridge_framework::{BridgeArgs, BridgeConfig, BridgeRunner};

use generator2mqtt::bridge::GeneratorBridge;
use generator2mqtt::config::GeneratorBridgeConfig;
use generator2mqtt::device::INBOUND_TOPICS;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = BridgeArgs::parse_with_default("generator2mqtt.json5");

    // Load configuration using the framework's BridgeConfig trait
    let config = GeneratorBridgeConfig::load(&args.config)
        .with_context(|| format!("Failed to load config from {:?}", args.config))?;

    let mut runner = BridgeRunner::new_with_args("generator2mqtt", config, Some(&args))
        .context("Failed to start bridge")?;

    let inbound = runner
        .subscribe(INBOUND_TOPICS)
        .context("Failed to register subscriptions")?;
    let publisher = runner.publisher();
    let poll_interval = runner.config().bridge.poll_interval();

    let bridge = GeneratorBridge::new().context("Failed to build discovery documents")?;

    tracing::info!(
        "Generator bridge publishing to '{}' (availability: {}, interval: {}ms)",
        generator2mqtt::device::BRIDGE_PREFIX,
        runner.availability_topic(),
        poll_interval.as_millis()
    );

    runner.spawn(bridge.run(inbound, publisher, poll_interval));

    // Run until Ctrl+C (handles shutdown gracefully)
    runner.run().await.context("Bridge terminated with an error")
}
