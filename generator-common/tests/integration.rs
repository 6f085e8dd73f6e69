//! Integration tests for generator-common library.

use generator_common::{
    DISCOVERY_PREFIX, DiscoveryDevice, MqttConfig, SensorDiscovery, TopicBuilder,
    discovery_topic, mqtt_options,
};

#[test]
fn test_mqtt_options_from_parsed_config() {
    let config: MqttConfig = json5::from_str(
        r#"{
            // comments are allowed in JSON5
            host: "mqtt.example", port: 8883, username: "gen", password: "pw",
        }"#,
    )
    .unwrap();

    let options = mqtt_options(&config, "generator2mqtt/status").unwrap();
    assert_eq!(options.broker_address(), ("mqtt.example".to_string(), 8883));
}

#[test]
fn test_mqtt_options_rejects_invalid_config() {
    let config: MqttConfig = json5::from_str(r#"{ host: "", client_id: "gen" }"#).unwrap();
    assert!(mqtt_options(&config, "generator2mqtt/status").is_err());
}

#[test]
fn test_discovery_document_points_at_bridge_topics() {
    let topics = TopicBuilder::new("generator2mqtt");
    let device = DiscoveryDevice::new("predator3500", "Harbor Freight", "Predator 3500", "Generator");

    let sensor = SensorDiscovery::new(
        device,
        "generator_fan_wattage",
        "Generator Fan Wattage",
        topics.build("fan_wattage"),
    )
    .measurement("power", "W")
    .with_availability_topic(topics.availability());

    let config_topic = discovery_topic(DISCOVERY_PREFIX, "sensor", &sensor.unique_id);
    assert_eq!(
        config_topic,
        "homeassistant/sensor/generator_fan_wattage/config"
    );

    let decoded: SensorDiscovery = serde_json::from_str(&sensor.to_json().unwrap()).unwrap();
    assert_eq!(decoded, sensor);
    assert_eq!(decoded.state_topic, "generator2mqtt/fan_wattage");
    assert_eq!(decoded.unit_of_measurement.as_deref(), Some("W"));
}
