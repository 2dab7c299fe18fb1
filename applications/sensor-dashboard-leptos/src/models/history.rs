use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Timing;

/// A manually entered consumption value in kWh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitConsumption {
    pub value: f64,
    pub timestamp: DateTime<Utc>,
}

/// One recorded row: the mirrored reading at the moment a consumption value was added.
/// Keys stay camelCase so existing browser storage keeps loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub current: Option<f64>,
    pub voltage: Option<f64>,
    pub timing: Option<Timing>,
    pub unit_consumption: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_history_entry_uses_camel_case_keys() {
        let entry = HistoryEntry {
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            current: Some(2.5),
            voltage: Some(220.0),
            timing: None,
            unit_consumption: Some(1.25),
        };

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["unitConsumption"], serde_json::json!(1.25));
        assert_eq!(json["timestamp"], serde_json::json!("2024-03-01T12:00:00Z"));
    }

    #[test]
    fn test_loads_entries_written_by_browser_date_json() {
        // Date.prototype.toJSON emits millisecond precision
        let raw = r#"[{"timestamp":"2024-03-01T12:00:00.123Z","current":2.5,"voltage":220,"timing":3600,"unitConsumption":4}]"#;
        let entries: Vec<HistoryEntry> = serde_json::from_str(raw).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].timing, Some(Timing::Seconds(3600.0)));
        assert_eq!(entries[0].unit_consumption, Some(4.0));
        assert_eq!(entries[0].timestamp.timestamp_subsec_millis(), 123);
    }
}
