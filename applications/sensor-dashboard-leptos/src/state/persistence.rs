//! Durable copy of the consumption log and history in browser localStorage

use gloo_storage::{errors::StorageError, LocalStorage, Storage};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use super::DashboardState;
use crate::models::{HistoryEntry, UnitConsumption};

pub const HISTORY_KEY: &str = "esp32DataHistory";
pub const UNITS_KEY: &str = "unitConsumptions";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PersistenceError {
    #[error("Stored value under {key} is unreadable: {message}")]
    Corrupt { key: String, message: String },
    #[error("Failed to write {key}: {message}")]
    Write { key: String, message: String },
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Key/value storage holding JSON documents
pub trait DurableStore {
    /// `Ok(None)` when nothing has been stored under `key` yet
    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, PersistenceError>;
    fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), PersistenceError>;
}

/// `window.localStorage`
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

impl DurableStore for BrowserStorage {
    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, PersistenceError> {
        match LocalStorage::get::<T>(key) {
            Ok(value) => Ok(Some(value)),
            Err(StorageError::KeyNotFound(_)) => Ok(None),
            Err(StorageError::SerdeError(e)) => Err(PersistenceError::Corrupt {
                key: key.to_string(),
                message: e.to_string(),
            }),
            Err(e) => Err(PersistenceError::Unavailable(e.to_string())),
        }
    }

    fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), PersistenceError> {
        LocalStorage::set(key, value).map_err(|e| PersistenceError::Write {
            key: key.to_string(),
            message: e.to_string(),
        })
    }
}

/// Rebuild dashboard state from storage. Each list falls back to empty on
/// its own when missing or unreadable; startup never fails.
pub fn load_state(store: &impl DurableStore) -> DashboardState {
    let history: Vec<HistoryEntry> = load_or_empty(store, HISTORY_KEY);
    let units: Vec<UnitConsumption> = load_or_empty(store, UNITS_KEY);

    log::debug!(
        "Loaded {} history entries and {} unit consumptions",
        history.len(),
        units.len()
    );

    DashboardState::new(units, history)
}

fn load_or_empty<T: DeserializeOwned>(store: &impl DurableStore, key: &str) -> Vec<T> {
    match store.load::<Vec<T>>(key) {
        Ok(Some(items)) => items,
        Ok(None) => Vec::new(),
        Err(e) => {
            log::error!("Error loading from localStorage: {}", e);
            Vec::new()
        }
    }
}

/// Write both lists. Failures are logged and otherwise ignored; the
/// in-memory state stays authoritative.
pub fn save_state(store: &impl DurableStore, state: &DashboardState) {
    if let Err(e) = store.save(HISTORY_KEY, &state.history) {
        log::error!("Error saving to localStorage: {}", e);
    }
    if let Err(e) = store.save(UNITS_KEY, &state.unit_consumptions) {
        log::error!("Error saving to localStorage: {}", e);
    }
}
