//! Dashboard state and its transitions.
//!
//! Nothing in here touches the DOM, the network or storage. Components call
//! these methods inside signal updates and render from the result.

use chrono::{DateTime, Utc};

use crate::api::ApiError;
use crate::error::DashboardError;
use crate::models::{HistoryEntry, Reading, Timing, UnitConsumption};

/// How often the relay is polled
pub const POLL_INTERVAL_MS: u32 = 2_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Offline,
    Online,
}

/// Last known value of each field, used to build history rows.
/// A null in a later poll does not erase a value; only `clear_all` resets them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadingMirror {
    pub current: Option<f64>,
    pub voltage: Option<f64>,
    pub timing: Option<Timing>,
    pub last_update: Option<DateTime<Utc>>,
}

impl ReadingMirror {
    fn merge(&mut self, reading: Reading, now: DateTime<Utc>) {
        if reading.current.is_some() {
            self.current = reading.current;
        }
        if reading.voltage.is_some() {
            self.voltage = reading.voltage;
        }
        if reading.timing.is_some() {
            self.timing = reading.timing;
        }
        self.last_update = Some(now);
    }

    /// History rows need both measurements
    pub fn has_measurements(&self) -> bool {
        self.current.is_some() && self.voltage.is_some()
    }
}

/// Result of one poll against the relay
#[derive(Debug, Clone)]
pub enum PollOutcome {
    Data(Reading),
    NoData,
    Failed(ApiError),
}

impl From<Result<Reading, ApiError>> for PollOutcome {
    fn from(result: Result<Reading, ApiError>) -> Self {
        match result {
            Ok(reading) if reading.has_data() => PollOutcome::Data(reading),
            Ok(_) => PollOutcome::NoData,
            Err(err) => PollOutcome::Failed(err),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    /// Reading from the most recent poll that returned data, shown on the cards
    pub latest: Reading,
    pub mirror: ReadingMirror,
    pub status: ConnectionStatus,
    pub unit_consumptions: Vec<UnitConsumption>,
    pub history: Vec<HistoryEntry>,
    poll_in_flight: bool,
}

impl DashboardState {
    pub fn new(unit_consumptions: Vec<UnitConsumption>, history: Vec<HistoryEntry>) -> Self {
        Self {
            unit_consumptions,
            history,
            ..Default::default()
        }
    }

    /// Claim the poll slot. Returns false when the previous poll has not
    /// finished yet; the caller skips this tick.
    pub fn begin_poll(&mut self) -> bool {
        if self.poll_in_flight {
            return false;
        }
        self.poll_in_flight = true;
        true
    }

    pub fn finish_poll(&mut self, outcome: PollOutcome, now: DateTime<Utc>) {
        self.poll_in_flight = false;

        match outcome {
            PollOutcome::Data(reading) => {
                self.latest = reading.clone();
                self.mirror.merge(reading, now);
                self.status = ConnectionStatus::Online;
            }
            PollOutcome::NoData => {
                self.status = ConnectionStatus::Offline;
            }
            PollOutcome::Failed(err) => {
                log::error!("Error fetching ESP32 data: {}", err);
                self.status = ConnectionStatus::Offline;
            }
        }
    }

    /// Append a consumption value and, when the mirror holds both current and
    /// voltage, one history row combining them.
    ///
    /// Returns whether a history row was recorded.
    pub fn record_annotation(
        &mut self,
        value: f64,
        now: DateTime<Utc>,
    ) -> Result<bool, DashboardError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(DashboardError::InvalidInput);
        }

        self.unit_consumptions.push(UnitConsumption {
            value,
            timestamp: now,
        });

        if !self.mirror.has_measurements() {
            return Ok(false);
        }

        self.history.push(HistoryEntry {
            timestamp: now,
            current: self.mirror.current,
            voltage: self.mirror.voltage,
            timing: self.mirror.timing.clone(),
            unit_consumption: Some(value),
        });
        Ok(true)
    }

    /// Remove the consumption entry at `index`. Recorded history is kept.
    pub fn remove_annotation(&mut self, index: usize) -> Option<UnitConsumption> {
        if index < self.unit_consumptions.len() {
            Some(self.unit_consumptions.remove(index))
        } else {
            None
        }
    }

    /// Drop history, consumption entries and the known reading.
    /// Connection status is left to the next poll.
    pub fn clear_all(&mut self) {
        self.history.clear();
        self.unit_consumptions.clear();
        self.latest = Reading::default();
        self.mirror = ReadingMirror::default();
    }
}

/// Parse the consumption input box
pub fn parse_consumption(raw: &str) -> Result<f64, DashboardError> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(value),
        _ => Err(DashboardError::InvalidInput),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::REQUEST_TIMEOUT_MS;
    use crate::format::{display_number, display_timing};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_714_560_000 + secs, 0).unwrap()
    }

    fn reading(current: Option<f64>, voltage: Option<f64>, timing: Option<Timing>) -> Reading {
        Reading {
            current,
            voltage,
            timing,
        }
    }

    fn online_state() -> DashboardState {
        let mut state = DashboardState::default();
        state.finish_poll(
            PollOutcome::Data(reading(
                Some(2.5),
                Some(220.0),
                Some(Timing::Seconds(90.0)),
            )),
            at(1),
        );
        state
    }

    #[test]
    fn test_initial_state_is_offline_and_empty() {
        let state = DashboardState::default();
        assert_eq!(state.status, ConnectionStatus::Offline);
        assert_eq!(state.mirror, ReadingMirror::default());
        assert!(state.unit_consumptions.is_empty());
        assert!(state.history.is_empty());
    }

    #[test]
    fn test_poll_with_data_goes_online() {
        let state = online_state();

        assert_eq!(state.status, ConnectionStatus::Online);
        assert_eq!(state.mirror.current, Some(2.5));
        assert_eq!(state.mirror.voltage, Some(220.0));
        assert_eq!(state.mirror.timing, Some(Timing::Seconds(90.0)));
        assert_eq!(state.mirror.last_update, Some(at(1)));
    }

    #[test]
    fn test_all_null_poll_goes_offline_and_keeps_mirror() {
        let mut state = online_state();
        let mirror_before = state.mirror.clone();

        let outcome = PollOutcome::from(Ok(Reading::default()));
        assert!(matches!(outcome, PollOutcome::NoData));
        state.finish_poll(outcome, at(5));

        assert_eq!(state.status, ConnectionStatus::Offline);
        assert_eq!(state.mirror, mirror_before);
    }

    #[test]
    fn test_failed_poll_goes_offline_and_keeps_mirror() {
        let mut state = online_state();
        let mirror_before = state.mirror.clone();

        state.finish_poll(
            PollOutcome::from(Err(ApiError::Http {
                status: 502,
                message: "Bad Gateway".to_string(),
            })),
            at(5),
        );
        assert_eq!(state.status, ConnectionStatus::Offline);
        assert_eq!(state.mirror, mirror_before);

        state.finish_poll(
            PollOutcome::Failed(ApiError::Network("connection refused".to_string())),
            at(7),
        );
        assert_eq!(state.status, ConnectionStatus::Offline);
        assert_eq!(state.mirror, mirror_before);
    }

    #[test]
    fn test_nulled_field_shows_placeholder_but_stays_recordable() {
        let mut state = online_state();

        state.finish_poll(
            PollOutcome::Data(reading(None, Some(231.0), None)),
            at(3),
        );

        assert_eq!(state.status, ConnectionStatus::Online);
        assert_eq!(display_number(state.latest.current), "--");
        assert_eq!(display_number(state.latest.voltage), "231.00");
        assert_eq!(display_timing(state.latest.timing.as_ref()), "--");

        assert!(state.mirror.has_measurements());
        assert_eq!(state.mirror.current, Some(2.5));
        assert_eq!(state.mirror.voltage, Some(231.0));
        assert_eq!(state.mirror.timing, Some(Timing::Seconds(90.0)));

        assert!(state.record_annotation(1.0, at(4)).unwrap());
        assert_eq!(state.history[0].current, Some(2.5));
        assert_eq!(state.history[0].voltage, Some(231.0));
    }

    #[test]
    fn test_no_data_poll_keeps_displayed_reading() {
        let mut state = online_state();
        state.finish_poll(PollOutcome::NoData, at(4));

        assert_eq!(state.status, ConnectionStatus::Offline);
        assert_eq!(state.latest.current, Some(2.5));
    }

    #[test]
    fn test_offline_after_fresh_store() {
        let mut state = DashboardState::default();
        assert!(state.begin_poll());
        state.finish_poll(PollOutcome::from(Ok(Reading::default())), at(0));

        assert_eq!(state.status, ConnectionStatus::Offline);
        assert_eq!(state.mirror.last_update, None);
    }

    #[test]
    fn test_overlapping_poll_is_skipped() {
        let mut state = DashboardState::default();

        assert!(state.begin_poll());
        assert!(state.poll_in_flight);
        assert!(!state.begin_poll());

        state.finish_poll(PollOutcome::NoData, at(0));
        assert!(!state.poll_in_flight);
        assert!(state.begin_poll());
    }

    #[test]
    fn test_timed_out_poll_goes_offline_and_frees_slot() {
        let mut state = online_state();

        assert!(state.begin_poll());
        assert!(!state.begin_poll());

        state.finish_poll(
            PollOutcome::from(Err(ApiError::timed_out(REQUEST_TIMEOUT_MS))),
            at(4),
        );

        assert_eq!(state.status, ConnectionStatus::Offline);
        assert!(!state.poll_in_flight);
        assert!(state.begin_poll());
    }

    #[test]
    fn test_request_timeout_fits_inside_poll_interval() {
        assert!(REQUEST_TIMEOUT_MS < POLL_INTERVAL_MS);
    }

    #[test]
    fn test_record_without_measurements_skips_history() {
        let mut state = DashboardState::default();

        let recorded = state.record_annotation(3.2, at(0)).unwrap();

        assert!(!recorded);
        assert_eq!(state.unit_consumptions.len(), 1);
        assert!(state.history.is_empty());
    }

    #[test]
    fn test_record_with_measurements_appends_history() {
        let mut state = online_state();

        let recorded = state.record_annotation(1.75, at(10)).unwrap();

        assert!(recorded);
        assert_eq!(state.unit_consumptions.len(), 1);
        assert_eq!(
            state.history,
            vec![HistoryEntry {
                timestamp: at(10),
                current: Some(2.5),
                voltage: Some(220.0),
                timing: Some(Timing::Seconds(90.0)),
                unit_consumption: Some(1.75),
            }]
        );
    }

    #[test]
    fn test_record_needs_both_current_and_voltage() {
        let mut state = DashboardState::default();
        state.finish_poll(PollOutcome::Data(reading(Some(1.0), None, None)), at(0));

        assert!(!state.record_annotation(2.0, at(1)).unwrap());
        assert!(state.history.is_empty());
    }

    #[test]
    fn test_record_rejects_non_positive_values() {
        let mut state = online_state();
        let before = state.clone();

        assert_eq!(
            state.record_annotation(-5.0, at(2)),
            Err(DashboardError::InvalidInput)
        );
        assert_eq!(
            state.record_annotation(0.0, at(2)),
            Err(DashboardError::InvalidInput)
        );
        assert_eq!(
            state.record_annotation(f64::NAN, at(2)),
            Err(DashboardError::InvalidInput)
        );
        assert_eq!(
            state.record_annotation(f64::INFINITY, at(2)),
            Err(DashboardError::InvalidInput)
        );

        assert_eq!(state, before);
    }

    #[test]
    fn test_record_grows_units_by_one_each_time() {
        let mut state = online_state();

        for (i, value) in [0.5, 1.0, 12.25].into_iter().enumerate() {
            let history_before = state.history.len();
            state.record_annotation(value, at(i as i64)).unwrap();
            assert_eq!(state.unit_consumptions.len(), i + 1);
            assert!(state.history.len() >= history_before);
        }
        assert_eq!(state.history.len(), 3);
    }

    #[test]
    fn test_remove_annotation_keeps_history() {
        let mut state = online_state();
        state.record_annotation(1.0, at(1)).unwrap();
        state.record_annotation(2.0, at(2)).unwrap();
        state.record_annotation(3.0, at(3)).unwrap();

        let removed = state.remove_annotation(1).unwrap();

        assert_eq!(removed.value, 2.0);
        let values: Vec<f64> = state.unit_consumptions.iter().map(|u| u.value).collect();
        assert_eq!(values, vec![1.0, 3.0]);
        assert_eq!(state.history.len(), 3);
    }

    #[test]
    fn test_remove_out_of_range_is_noop() {
        let mut state = DashboardState::default();
        state.record_annotation(1.0, at(0)).unwrap();

        assert_eq!(state.remove_annotation(4), None);
        assert_eq!(state.unit_consumptions.len(), 1);
    }

    #[test]
    fn test_clear_all_resets_lists_and_mirror() {
        let mut state = online_state();
        state.record_annotation(4.0, at(2)).unwrap();

        state.clear_all();

        assert!(state.history.is_empty());
        assert!(state.unit_consumptions.is_empty());
        assert_eq!(state.mirror, ReadingMirror::default());
        assert_eq!(state.latest, Reading::default());
    }

    #[test]
    fn test_parse_consumption() {
        assert_eq!(parse_consumption("12.5"), Ok(12.5));
        assert_eq!(parse_consumption("  3 "), Ok(3.0));
        assert_eq!(parse_consumption("-5"), Err(DashboardError::InvalidInput));
        assert_eq!(parse_consumption("0"), Err(DashboardError::InvalidInput));
        assert_eq!(parse_consumption("abc"), Err(DashboardError::InvalidInput));
        assert_eq!(parse_consumption(""), Err(DashboardError::InvalidInput));
        assert_eq!(parse_consumption("inf"), Err(DashboardError::InvalidInput));
    }
}
