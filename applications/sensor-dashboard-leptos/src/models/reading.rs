use serde::{Deserialize, Serialize};

/// Timing as reported by the device: seconds, or an opaque label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timing {
    Seconds(f64),
    Label(String),
}

/// Latest reading as served by the relay.
/// The relay's own `timestamp` is ignored; freshness is tracked client side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub current: Option<f64>,
    pub voltage: Option<f64>,
    pub timing: Option<Timing>,
}

impl Reading {
    /// The relay answers with all-null fields until the device has pushed something
    pub fn has_data(&self) -> bool {
        self.current.is_some() || self.voltage.is_some() || self.timing.is_some()
    }
}
