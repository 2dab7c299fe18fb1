//! Display strings shared by the cards, the history table and CSV export

use chrono::{DateTime, Local, TimeZone, Utc};

use crate::models::Timing;
use crate::state::ConnectionStatus;

/// Shown on screen for a value the device has not reported
pub const PLACEHOLDER: &str = "--";

/// Two decimals, ties rounded away from zero
pub fn format_number(value: f64) -> String {
    format!("{:.2}", (value * 100.0).round() / 100.0)
}

pub fn display_number(value: Option<f64>) -> String {
    value.map(format_number).unwrap_or_else(|| PLACEHOLDER.to_string())
}

pub fn export_number(value: Option<f64>) -> String {
    value.map(format_number).unwrap_or_default()
}

/// Seconds become `HH:MM:SS` with hours allowed past 24; labels pass through
pub fn format_timing(timing: &Timing) -> String {
    match timing {
        Timing::Seconds(secs) if secs.is_finite() && *secs >= 0.0 => {
            let total = secs.floor() as u64;
            format!(
                "{:02}:{:02}:{:02}",
                total / 3600,
                (total % 3600) / 60,
                total % 60
            )
        }
        Timing::Seconds(secs) => secs.to_string(),
        Timing::Label(label) => label.clone(),
    }
}

pub fn display_timing(timing: Option<&Timing>) -> String {
    timing
        .map(format_timing)
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

pub fn export_timing(timing: Option<&Timing>) -> String {
    timing.map(format_timing).unwrap_or_default()
}

/// `YYYY-MM-DD HH:MM:SS` in the given zone
pub fn format_datetime_in<Tz: TimeZone>(instant: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    instant
        .with_timezone(tz)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// `YYYY-MM-DD HH:MM:SS` in the browser's local time
pub fn format_datetime(instant: &DateTime<Utc>) -> String {
    format_datetime_in(instant, &Local)
}

/// `HH:MM:SS` in the browser's local time
pub fn format_time(instant: &DateTime<Utc>) -> String {
    instant.with_timezone(&Local).format("%H:%M:%S").to_string()
}

pub fn status_text(status: ConnectionStatus, last_update: Option<&DateTime<Utc>>) -> String {
    match (status, last_update) {
        (ConnectionStatus::Online, Some(at)) => {
            format!("Connected to ESP32 - Last update: {}", format_time(at))
        }
        (ConnectionStatus::Online, None) => "Connected to ESP32".to_string(),
        (ConnectionStatus::Offline, _) => "Waiting for ESP32 data...".to_string(),
    }
}

/// Line in the consumption list
pub fn unit_consumption_label(value: f64, timestamp: &DateTime<Utc>) -> String {
    format!("{} kWh - {}", format_number(value), format_datetime(timestamp))
}
