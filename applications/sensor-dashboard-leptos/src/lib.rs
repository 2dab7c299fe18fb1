use leptos::*;
use wasm_bindgen::prelude::*;

pub mod api;
mod app;
mod components;
pub mod error;
pub mod export;
pub mod format;
pub mod models;
pub mod state;

/// WASM entry point - called when the WASM module loads
#[wasm_bindgen(start)]
pub fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    _ = console_log::init_with_level(log::Level::Debug);

    log::info!("Starting ESP32 Power Monitor");

    mount_to_body(|| view! { <app::App /> });
}
