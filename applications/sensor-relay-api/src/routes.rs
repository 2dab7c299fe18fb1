use axum::{extract::Request, routing::get, Router};
use std::path::Path;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::Level;

use crate::handlers::{health::health, reading};
use crate::store::RelayStore;

pub fn create_router(store: RelayStore, static_dir: impl AsRef<Path>) -> Router {
    let static_dir = static_dir.as_ref();
    let index = ServeFile::new(static_dir.join("index.html"));

    Router::new()
        .route("/health", get(health))
        .route(
            "/api/esp32-data",
            get(reading::get_latest).post(reading::ingest),
        )
        .route_service("/", index)
        .fallback_service(ServeDir::new(static_dir))
        .with_state(store)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request| {
                    tracing::span!(
                        Level::INFO,
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                    )
                })
                .on_request(|_request: &Request, _span: &tracing::Span| {
                    tracing::event!(Level::DEBUG, "received request");
                })
                .on_response(
                    |_response: &axum::response::Response,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        tracing::event!(Level::DEBUG, latency = ?latency, "request completed");
                    },
                )
                .on_failure(
                    |_error: tower_http::classify::ServerErrorsFailureClass,
                     _latency: std::time::Duration,
                     _span: &tracing::Span| {
                        tracing::event!(Level::ERROR, "request failed");
                    },
                ),
        )
}
