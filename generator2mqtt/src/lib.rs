//! MQTT bridge deriving a generator's run state from smart-plug telemetry.
//!
//! The plug on the generator's cooling fan reports its availability, voltage
//! and power draw. This bridge republishes the readings together with a
//! derived `OFF`/`RUNNING`/`ERROR` state and registers all three as Home
//! Assistant sensors.
//!
//! # Topics
//!
//! ```text
//! esphome/generator-plug/{status,voltage,wattage}   (inbound)
//! generator2mqtt/{state,voltage,fan_wattage}        (outbound)
//! generator2mqtt/status                             (availability)
//! homeassistant/sensor/<unique_id>/config           (discovery)
//! ```

pub mod bridge;
pub mod config;
pub mod device;
pub mod evaluator;
pub mod tracker;
