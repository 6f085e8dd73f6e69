//! Generator run-state derivation.

use std::fmt;

/// Plug status reported while the plug is reachable.
pub const ONLINE_STATUS: &str = "online";

/// Lowest voltage at which the generator counts as running.
pub const MIN_RUNNING_VOLTAGE: f64 = 110.0;

/// Lowest fan draw at which the generator counts as running.
pub const MIN_RUNNING_WATTAGE: f64 = 50.0;

/// Derived operational state of the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneratorState {
    Off,
    Running,
    Error,
}

impl GeneratorState {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeneratorState::Off => "OFF",
            GeneratorState::Running => "RUNNING",
            GeneratorState::Error => "ERROR",
        }
    }
}

impl fmt::Display for GeneratorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Latest raw values reported by the plug. `None` means never received.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Readings<'a> {
    pub status: Option<&'a str>,
    pub voltage: Option<&'a str>,
    pub wattage: Option<&'a str>,
}

/// Result of evaluating a set of readings.
///
/// `voltage` and `wattage` are the passthrough values to republish; they are
/// cleared whenever the state is [`GeneratorState::Off`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation<'a> {
    pub state: GeneratorState,
    pub voltage: Option<&'a str>,
    pub wattage: Option<&'a str>,
}

/// Derive the generator state from the plug readings.
///
/// Rules, in order:
/// 1. plug not `online`, or voltage or wattage missing: `OFF`
/// 2. voltage ≥ 110 and wattage ≥ 50: `RUNNING`
/// 3. anything else, including non-numeric readings: `ERROR`
pub fn evaluate(readings: Readings<'_>) -> GeneratorState {
    let (Some(voltage), Some(wattage)) = (readings.voltage, readings.wattage) else {
        return GeneratorState::Off;
    };
    if readings.status != Some(ONLINE_STATUS) {
        return GeneratorState::Off;
    }

    if meets_threshold(voltage, MIN_RUNNING_VOLTAGE) && meets_threshold(wattage, MIN_RUNNING_WATTAGE)
    {
        GeneratorState::Running
    } else {
        GeneratorState::Error
    }
}

/// Evaluate readings and select the passthrough values to publish.
pub fn evaluate_outputs(readings: Readings<'_>) -> Evaluation<'_> {
    let state = evaluate(readings);
    match state {
        GeneratorState::Off => Evaluation {
            state,
            voltage: None,
            wattage: None,
        },
        GeneratorState::Running | GeneratorState::Error => Evaluation {
            state,
            voltage: readings.voltage,
            wattage: readings.wattage,
        },
    }
}

/// Parse a reading as a finite decimal number, ignoring surrounding whitespace.
///
/// `inf`, `infinity` and `NaN` spellings are rejected.
pub fn parse_reading(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Whether `raw` parses to a number at or above `min`.
fn meets_threshold(raw: &str, min: f64) -> bool {
    parse_reading(raw).is_some_and(|value| value >= min)
}
