use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::models::{Reading, ReadingUpdate};

/// Process-wide single slot holding the latest reading.
///
/// Cheap to clone; every clone shares the same slot. Updates happen under a
/// single write guard so readers never see a half-merged reading.
#[derive(Clone, Default)]
pub struct RelayStore {
    latest: Arc<RwLock<Reading>>,
}

impl RelayStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `update` over the current reading and return the stored result
    pub async fn ingest(&self, update: ReadingUpdate) -> Reading {
        let mut latest = self.latest.write().await;
        latest.apply(update, Utc::now());
        latest.clone()
    }

    pub async fn retrieve(&self) -> Reading {
        self.latest.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Timing;
    use serde_json::json;

    fn update(body: serde_json::Value) -> ReadingUpdate {
        ReadingUpdate::from_json(&body).unwrap()
    }

    #[tokio::test]
    async fn test_fresh_store_is_all_null() {
        let store = RelayStore::new();
        assert_eq!(store.retrieve().await, Reading::default());
    }

    #[tokio::test]
    async fn test_ingest_then_retrieve() {
        let store = RelayStore::new();
        let before = Utc::now();

        let stored = store
            .ingest(update(json!({ "current": 2.5, "voltage": 220.0 })))
            .await;
        let retrieved = store.retrieve().await;

        assert_eq!(stored, retrieved);
        assert_eq!(retrieved.current, Some(2.5));
        assert_eq!(retrieved.voltage, Some(220.0));
        assert_eq!(retrieved.timing, None);
        assert!(retrieved.timestamp.unwrap() >= before);
    }

    #[tokio::test]
    async fn test_timing_only_ingest_preserves_measurements() {
        let store = RelayStore::new();
        store
            .ingest(update(json!({ "current": 1.2, "voltage": 231.0 })))
            .await;
        store.ingest(update(json!({ "timing": "00:10" }))).await;

        let reading = store.retrieve().await;
        assert_eq!(reading.current, Some(1.2));
        assert_eq!(reading.voltage, Some(231.0));
        assert_eq!(reading.timing, Some(Timing::Label("00:10".to_string())));
    }

    #[tokio::test]
    async fn test_retrieve_is_idempotent() {
        let store = RelayStore::new();
        store.ingest(update(json!({ "current": 3.0 }))).await;

        let first = store.retrieve().await;
        let second = store.retrieve().await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_clones_share_the_slot() {
        let store = RelayStore::new();
        let handler_copy = store.clone();

        handler_copy.ingest(update(json!({ "voltage": 229.5 }))).await;
        assert_eq!(store.retrieve().await.voltage, Some(229.5));
    }

    #[tokio::test]
    async fn test_concurrent_ingests_last_write_wins() {
        let store = RelayStore::new();
        let mut tasks = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                store
                    .ingest(update(json!({ "current": i as f64, "voltage": i as f64 })))
                    .await
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        // Each ingest writes both fields together, so they always match.
        let reading = store.retrieve().await;
        assert_eq!(reading.current, reading.voltage);
    }
}
