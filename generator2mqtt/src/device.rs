//! Fixed topics and identity of the bridged generator.
//!
//! The generator is monitored through an ESPHome smart plug feeding its
//! cooling fan. The plug reports `status`, `voltage` and `wattage`; the bridge
//! republishes voltage and wattage and a derived run state under
//! [`BRIDGE_PREFIX`].

use generator_common::{
    DISCOVERY_PREFIX, DiscoveryDevice, SensorDiscovery, TopicBuilder, discovery_topic,
};

/// Prefix every outbound topic is published under.
pub const BRIDGE_PREFIX: &str = "generator2mqtt";

/// Smart plug availability (`online` when reachable).
pub const PLUG_STATUS_TOPIC: &str = "esphome/generator-plug/status";
/// Smart plug voltage reading.
pub const PLUG_VOLTAGE_TOPIC: &str = "esphome/generator-plug/voltage";
/// Smart plug power draw reading.
pub const PLUG_WATTAGE_TOPIC: &str = "esphome/generator-plug/wattage";

/// Every inbound topic the bridge subscribes to.
pub const INBOUND_TOPICS: [&str; 3] = [PLUG_STATUS_TOPIC, PLUG_VOLTAGE_TOPIC, PLUG_WATTAGE_TOPIC];

pub const STATE_METRIC: &str = "state";
pub const VOLTAGE_METRIC: &str = "voltage";
pub const FAN_WATTAGE_METRIC: &str = "fan_wattage";

/// Device block attached to every discovery document.
pub fn generator_device() -> DiscoveryDevice {
    DiscoveryDevice::new("predator3500", "Harbor Freight", "Predator 3500", "Generator")
}

/// Outbound topics for the bridge's sensors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTopics {
    pub state: String,
    pub voltage: String,
    pub fan_wattage: String,
    pub availability: String,
}

impl OutputTopics {
    pub fn new() -> Self {
        let builder = TopicBuilder::new(BRIDGE_PREFIX);
        Self {
            state: builder.build(STATE_METRIC),
            voltage: builder.build(VOLTAGE_METRIC),
            fan_wattage: builder.build(FAN_WATTAGE_METRIC),
            availability: builder.availability(),
        }
    }
}

impl Default for OutputTopics {
    fn default() -> Self {
        Self::new()
    }
}

/// Discovery documents for the three sensors, keyed by config topic.
pub fn discovery_documents(topics: &OutputTopics) -> Vec<(String, SensorDiscovery)> {
    let sensors = [
        SensorDiscovery::new(
            generator_device(),
            "generator_voltage",
            "Generator Voltage",
            topics.voltage.as_str(),
        )
        .measurement("voltage", "V"),
        SensorDiscovery::new(
            generator_device(),
            "generator_fan_wattage",
            "Generator Fan Wattage",
            topics.fan_wattage.as_str(),
        )
        .measurement("power", "W"),
        SensorDiscovery::new(
            generator_device(),
            "generator_state",
            "Generator State",
            topics.state.as_str(),
        ),
    ];

    sensors
        .into_iter()
        .map(|sensor| {
            let sensor = sensor.with_availability_topic(topics.availability.as_str());
            (
                discovery_topic(DISCOVERY_PREFIX, "sensor", &sensor.unique_id),
                sensor,
            )
        })
        .collect()
}
