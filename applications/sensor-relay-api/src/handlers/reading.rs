use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{AppError, Result};
use crate::models::{IngestResponse, Reading, ReadingUpdate};
use crate::store::RelayStore;

/// POST /api/esp32-data
///
/// Accepts any subset of `current`, `voltage` and `timing`. The payload is
/// validated as a whole before the store is touched.
pub async fn ingest(
    State(store): State<RelayStore>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<IngestResponse>> {
    let Json(body) =
        payload.map_err(|rejection| AppError::InvalidInput(rejection.body_text()))?;
    let update = ReadingUpdate::from_json(&body)?;
    if update.is_empty() {
        debug!("ingest without sensor fields, refreshing timestamp only");
    }

    let reading = store.ingest(update).await;
    info!(
        current = ?reading.current,
        voltage = ?reading.voltage,
        timing = ?reading.timing,
        "received sensor data"
    );

    Ok(Json(IngestResponse::received(reading)))
}

/// GET /api/esp32-data
pub async fn get_latest(State(store): State<RelayStore>) -> Json<Reading> {
    Json(store.retrieve().await)
}
