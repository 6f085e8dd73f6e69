//! Last-seen inputs and last-published outputs.

use std::collections::HashMap;

use crate::device::{PLUG_STATUS_TOPIC, PLUG_VOLTAGE_TOPIC, PLUG_WATTAGE_TOPIC};
use crate::evaluator::Readings;

/// One of the plug's inbound values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSlot {
    Status,
    Voltage,
    Wattage,
}

impl InputSlot {
    pub const ALL: [InputSlot; 3] = [InputSlot::Status, InputSlot::Voltage, InputSlot::Wattage];

    /// Topic the value arrives on.
    pub fn topic(&self) -> &'static str {
        match self {
            InputSlot::Status => PLUG_STATUS_TOPIC,
            InputSlot::Voltage => PLUG_VOLTAGE_TOPIC,
            InputSlot::Wattage => PLUG_WATTAGE_TOPIC,
        }
    }

    /// Map an inbound topic to its slot.
    pub fn from_topic(topic: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.topic() == topic)
    }
}

/// Latest raw value received for each input.
///
/// Values are only ever overwritten, never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputStore {
    status: Option<String>,
    voltage: Option<String>,
    wattage: Option<String>,
}

impl InputStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a value. Returns `true` if it differs from the previous one.
    pub fn set(&mut self, slot: InputSlot, value: impl Into<String>) -> bool {
        let value = value.into();
        let current = self.slot_mut(slot);
        if current.as_deref() == Some(value.as_str()) {
            return false;
        }
        *current = Some(value);
        true
    }

    pub fn get(&self, slot: InputSlot) -> Option<&str> {
        match slot {
            InputSlot::Status => self.status.as_deref(),
            InputSlot::Voltage => self.voltage.as_deref(),
            InputSlot::Wattage => self.wattage.as_deref(),
        }
    }

    /// Borrow the current values for evaluation.
    pub fn readings(&self) -> Readings<'_> {
        Readings {
            status: self.status.as_deref(),
            voltage: self.voltage.as_deref(),
            wattage: self.wattage.as_deref(),
        }
    }

    fn slot_mut(&mut self, slot: InputSlot) -> &mut Option<String> {
        match slot {
            InputSlot::Status => &mut self.status,
            InputSlot::Voltage => &mut self.voltage,
            InputSlot::Wattage => &mut self.wattage,
        }
    }
}

/// Payload last sent per outbound topic. A missing entry means nothing was
/// ever sent, which compares equal to an absent value.
#[derive(Debug, Clone, Default)]
pub struct PublishedOutputs {
    sent: HashMap<String, Option<String>>,
}

impl PublishedOutputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last payload sent to `topic`.
    pub fn get(&self, topic: &str) -> Option<&str> {
        self.sent.get(topic).and_then(|v| v.as_deref())
    }

    /// Whether publishing `value` to `topic` would change what was last sent.
    pub fn differs(&self, topic: &str, value: Option<&str>) -> bool {
        self.get(topic) != value
    }

    /// Record a successful publish.
    pub fn record(&mut self, topic: &str, value: Option<&str>) {
        self.sent
            .insert(topic.to_string(), value.map(str::to_string));
    }
}
