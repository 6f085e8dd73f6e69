//! Integration tests for generator2mqtt.

use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;

use generator_bridge_framework::{BridgeConfig, BridgeError, InboundMessage, MessageSink, Result};
use generator2mqtt::bridge::GeneratorBridge;
use generator2mqtt::config::GeneratorBridgeConfig;
use generator2mqtt::device::{PLUG_STATUS_TOPIC, PLUG_VOLTAGE_TOPIC, PLUG_WATTAGE_TOPIC};

#[derive(Clone, Default)]
struct RecordingSink {
    sent: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingSink {
    fn sent_to(&self, topic: &str) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(t, _)| t == topic)
            .map(|(_, p)| p.clone())
            .collect()
    }
}

impl MessageSink for RecordingSink {
    async fn publish(&self, topic: &str, payload: &[u8]) -> Result<()> {
        self.sent.lock().unwrap().push((
            topic.to_string(),
            String::from_utf8_lossy(payload).into_owned(),
        ));
        Ok(())
    }
}

/// Feed messages through the run loop and return what was published.
async fn run_with_messages(messages: Vec<(&str, &str)>) -> RecordingSink {
    let sink = RecordingSink::default();
    let (tx, rx) = mpsc::channel(16);
    let bridge = GeneratorBridge::new().unwrap();
    let handle = tokio::spawn(bridge.run(rx, sink.clone(), Duration::from_millis(20)));

    for (topic, payload) in messages {
        tx.send(InboundMessage::new(topic, payload)).await.unwrap();
    }
    // Let a few ticks pass with unchanged inputs.
    tokio::time::sleep(Duration::from_millis(100)).await;
    drop(tx);

    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("bridge should stop when the channel closes")
        .unwrap();
    sink
}

#[tokio::test]
async fn test_run_loop_reaches_running() {
    let sink = run_with_messages(vec![
        (PLUG_STATUS_TOPIC, "online"),
        (PLUG_VOLTAGE_TOPIC, "120"),
        (PLUG_WATTAGE_TOPIC, "60"),
    ])
    .await;

    assert_eq!(sink.sent_to("generator2mqtt/state"), vec!["OFF", "RUNNING"]);
    assert_eq!(sink.sent_to("generator2mqtt/voltage"), vec!["120"]);
    assert_eq!(sink.sent_to("generator2mqtt/fan_wattage"), vec!["60"]);
    assert_eq!(
        sink.sent_to("homeassistant/sensor/generator_state/config").len(),
        1
    );
}

#[tokio::test]
async fn test_run_loop_low_voltage_error() {
    let sink = run_with_messages(vec![
        (PLUG_STATUS_TOPIC, "online"),
        (PLUG_VOLTAGE_TOPIC, "90"),
        (PLUG_WATTAGE_TOPIC, "60"),
    ])
    .await;

    assert_eq!(
        sink.sent_to("generator2mqtt/state").last().map(String::as_str),
        Some("ERROR")
    );
}

#[tokio::test]
async fn test_run_loop_offline_plug_stays_off() {
    let sink = run_with_messages(vec![
        (PLUG_STATUS_TOPIC, "offline"),
        (PLUG_VOLTAGE_TOPIC, "120"),
        (PLUG_WATTAGE_TOPIC, "60"),
        ("esphome/generator-plug/unknown", "1"),
    ])
    .await;

    assert_eq!(sink.sent_to("generator2mqtt/state"), vec!["OFF"]);
    assert!(sink.sent_to("generator2mqtt/voltage").is_empty());
    assert!(sink.sent_to("generator2mqtt/fan_wattage").is_empty());
}

#[test]
fn test_load_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{ mqtt: {{ host: "127.0.0.1" }}, bridge: {{ poll_interval_ms: 250 }} }}"#
    )
    .unwrap();

    let config = GeneratorBridgeConfig::load(file.path()).unwrap();
    assert_eq!(config.mqtt.host, "127.0.0.1");
    assert_eq!(config.bridge.poll_interval(), Duration::from_millis(250));
}

#[test]
fn test_load_config_rejects_zero_interval() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{{ bridge: {{ poll_interval_ms: 0 }} }}").unwrap();

    let result = GeneratorBridgeConfig::load(file.path());
    assert!(matches!(result, Err(BridgeError::ConfigValidation(_))));
}

#[test]
fn test_bundled_config_is_valid() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/generator2mqtt.json5");
    let config = GeneratorBridgeConfig::load(path).unwrap();
    assert_eq!(config.mqtt.host, "debian.lan");
    assert_eq!(config.bridge.poll_interval_ms, 1000);
}
