use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, Result};

/// Timing value reported by the device.
/// Numbers are seconds; anything textual is kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timing {
    Seconds(f64),
    Label(String),
}

/// The latest snapshot pushed by the sensor device
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub current: Option<f64>,
    pub voltage: Option<f64>,
    pub timing: Option<Timing>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl Reading {
    /// Merge a validated update. Absent fields keep their value,
    /// explicit nulls clear it. The timestamp always moves to `now`.
    pub fn apply(&mut self, update: ReadingUpdate, now: DateTime<Utc>) {
        if let Some(current) = update.current {
            self.current = current;
        }
        if let Some(voltage) = update.voltage {
            self.voltage = voltage;
        }
        if let Some(timing) = update.timing {
            self.timing = timing;
        }
        self.timestamp = Some(now);
    }
}

/// A partial reading as sent by the device.
///
/// The outer `Option` is "field present in the payload", the inner one is
/// "field explicitly null".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadingUpdate {
    pub current: Option<Option<f64>>,
    pub voltage: Option<Option<f64>>,
    pub timing: Option<Option<Timing>>,
}

impl ReadingUpdate {
    /// Validate a raw ingest body. Fails on the first field that cannot be
    /// coerced, so nothing is stored from a partially bad payload.
    pub fn from_json(body: &Value) -> Result<Self> {
        let fields = body.as_object().ok_or_else(|| {
            AppError::InvalidInput("request body must be a JSON object".to_string())
        })?;

        Ok(Self {
            current: fields
                .get("current")
                .map(|value| parse_measurement("current", value))
                .transpose()?,
            voltage: fields
                .get("voltage")
                .map(|value| parse_measurement("voltage", value))
                .transpose()?,
            timing: fields.get("timing").map(parse_timing).transpose()?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none() && self.voltage.is_none() && self.timing.is_none()
    }
}

/// Numbers pass through, numeric strings are parsed (firmware sometimes
/// quotes its floats). Everything else is rejected.
fn parse_measurement(field: &str, value: &Value) -> Result<Option<f64>> {
    let parsed = match value {
        Value::Null => return Ok(None),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(AppError::InvalidInput(format!(
            "{} must be a finite number, got {}",
            field, value
        ))),
    }
}

fn parse_timing(value: &Value) -> Result<Option<Timing>> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_f64()
            .map(|secs| Some(Timing::Seconds(secs)))
            .ok_or_else(|| AppError::InvalidInput(format!("timing out of range: {}", n))),
        Value::String(s) => Ok(Some(Timing::Label(s.clone()))),
        other => Err(AppError::InvalidInput(format!(
            "timing must be a number or a string, got {}",
            other
        ))),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestResponse {
    pub success: bool,
    pub message: String,
    pub data: Reading,
}

impl IngestResponse {
    pub fn received(data: Reading) -> Self {
        Self {
            success: true,
            message: "Data received successfully".to_string(),
            data,
        }
    }
}
