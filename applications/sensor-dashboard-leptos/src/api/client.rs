use gloo_net::http::Request;
use gloo_timers::callback::Timeout;
use serde::de::DeserializeOwned;
use std::cell::Cell;
use std::rc::Rc;
use thiserror::Error;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

/// Requests still pending after this long are aborted. Kept below the poll
/// interval so a hung relay cannot hold the poll slot.
pub const REQUEST_TIMEOUT_MS: u32 = 1_500;

/// API error types
#[derive(Error, Debug, Clone)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },
    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

impl ApiError {
    pub fn timed_out(after_ms: u32) -> Self {
        ApiError::Network(format!("Request timed out after {} ms", after_ms))
    }
}

impl From<gloo_net::Error> for ApiError {
    fn from(err: gloo_net::Error) -> Self {
        ApiError::Network(err.to_string())
    }
}

/// API client for the relay
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    /// Create a new API client with the base URL from window.ENV
    pub fn new() -> Self {
        Self::with_base_url(get_api_url())
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Make a GET request and deserialize the response.
    /// Aborted after `REQUEST_TIMEOUT_MS`, body included.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let controller = web_sys::AbortController::new()
            .map_err(|_| ApiError::Network("AbortController unavailable".to_string()))?;
        let signal = controller.signal();

        let timed_out = Rc::new(Cell::new(false));
        let timeout = {
            let timed_out = Rc::clone(&timed_out);
            Timeout::new(REQUEST_TIMEOUT_MS, move || {
                timed_out.set(true);
                controller.abort();
            })
        };

        let result = match Request::get(&self.url(path))
            .abort_signal(Some(&signal))
            .send()
            .await
        {
            Ok(response) => self.handle_response(response).await,
            Err(err) => Err(err.into()),
        };
        drop(timeout);

        match result {
            Err(_) if timed_out.get() => Err(ApiError::timed_out(REQUEST_TIMEOUT_MS)),
            other => other,
        }
    }

    /// Handle the HTTP response
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: gloo_net::http::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();

        if !response.ok() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ApiError::Http { status, message });
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::Deserialization(e.to_string()))
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Get API URL from window.ENV, or talk to the origin that served the page
fn get_api_url() -> String {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(window) = web_sys::window() {
            if let Ok(env) = js_sys::Reflect::get(&window, &JsValue::from_str("ENV")) {
                if !env.is_undefined() {
                    if let Ok(api_url) = js_sys::Reflect::get(&env, &JsValue::from_str("API_URL")) {
                        if let Some(url) = api_url.as_string() {
                            return url;
                        }
                    }
                }
            }
        }
    }

    // Same origin: the relay serves this bundle
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = ApiClient::with_base_url("http://10.0.0.5:3000/");
        assert_eq!(
            client.url("/api/esp32-data"),
            "http://10.0.0.5:3000/api/esp32-data"
        );
    }

    #[test]
    fn test_timeout_is_a_network_error() {
        let err = ApiError::timed_out(1_500);
        assert!(matches!(&err, ApiError::Network(_)));
        assert_eq!(err.to_string(), "Network error: Request timed out after 1500 ms");
    }

    #[test]
    fn test_same_origin_url_is_relative() {
        let client = ApiClient::with_base_url("");
        assert_eq!(client.url("/api/esp32-data"), "/api/esp32-data");
    }
}
