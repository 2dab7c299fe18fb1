use super::client::{ApiClient, ApiError};
use crate::models::Reading;

impl ApiClient {
    /// Get the latest reading held by the relay
    pub async fn get_reading(&self) -> Result<Reading, ApiError> {
        self.get("/api/esp32-data").await
    }
}
