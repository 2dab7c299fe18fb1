pub mod client;
pub mod reading;

pub use client::{ApiClient, ApiError, REQUEST_TIMEOUT_MS};
