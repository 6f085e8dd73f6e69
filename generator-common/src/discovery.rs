//! Home Assistant MQTT discovery documents.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Device block shared by every entity a bridge registers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryDevice {
    /// Stable identifiers that group entities under one device.
    pub identifiers: Vec<String>,
    pub manufacturer: String,
    pub model: String,
    pub name: String,
}

impl DiscoveryDevice {
    pub fn new(
        identifier: impl Into<String>,
        manufacturer: impl Into<String>,
        model: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            identifiers: vec![identifier.into()],
            manufacturer: manufacturer.into(),
            model: model.into(),
            name: name.into(),
        }
    }
}

/// Discovery config for a single sensor entity.
///
/// Optional fields are omitted from the serialized document when unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorDiscovery {
    pub device: DiscoveryDevice,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_class: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_category: Option<String>,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_class: Option<String>,

    pub state_topic: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_topic: Option<String>,

    pub unique_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_of_measurement: Option<String>,
}

impl SensorDiscovery {
    /// Create a plain sensor with only the required fields set.
    pub fn new(
        device: DiscoveryDevice,
        unique_id: impl Into<String>,
        name: impl Into<String>,
        state_topic: impl Into<String>,
    ) -> Self {
        Self {
            device,
            device_class: None,
            entity_category: None,
            name: name.into(),
            state_class: None,
            state_topic: state_topic.into(),
            availability_topic: None,
            unique_id: unique_id.into(),
            unit_of_measurement: None,
        }
    }

    /// Mark this sensor as a diagnostic measurement of `device_class` in `unit`.
    pub fn measurement(
        mut self,
        device_class: impl Into<String>,
        unit: impl Into<String>,
    ) -> Self {
        self.device_class = Some(device_class.into());
        self.state_class = Some("measurement".to_string());
        self.entity_category = Some("diagnostic".to_string());
        self.unit_of_measurement = Some(unit.into());
        self
    }

    pub fn with_availability_topic(mut self, topic: impl Into<String>) -> Self {
        self.availability_topic = Some(topic.into());
        self
    }

    /// Serialize to the JSON payload Home Assistant expects.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device() -> DiscoveryDevice {
        DiscoveryDevice::new("predator3500", "Harbor Freight", "Predator 3500", "Generator")
    }

    #[test]
    fn test_plain_sensor_omits_optional_fields() {
        let sensor = SensorDiscovery::new(
            device(),
            "generator_state",
            "Generator State",
            "generator2mqtt/state",
        );

        let value: serde_json::Value = serde_json::from_str(&sensor.to_json().unwrap()).unwrap();
        assert_eq!(value["unique_id"], "generator_state");
        assert_eq!(value["state_topic"], "generator2mqtt/state");
        assert_eq!(value["device"]["identifiers"][0], "predator3500");
        assert!(value.get("device_class").is_none());
        assert!(value.get("unit_of_measurement").is_none());
        assert!(value.get("availability_topic").is_none());
    }

    #[test]
    fn test_measurement_sensor() {
        let sensor = SensorDiscovery::new(
            device(),
            "generator_voltage",
            "Generator Voltage",
            "generator2mqtt/voltage",
        )
        .measurement("voltage", "V")
        .with_availability_topic("generator2mqtt/status");

        let value: serde_json::Value = serde_json::from_str(&sensor.to_json().unwrap()).unwrap();
        assert_eq!(value["device_class"], "voltage");
        assert_eq!(value["state_class"], "measurement");
        assert_eq!(value["entity_category"], "diagnostic");
        assert_eq!(value["unit_of_measurement"], "V");
        assert_eq!(value["availability_topic"], "generator2mqtt/status");
        assert_eq!(value["device"]["manufacturer"], "Harbor Freight");
    }
}
