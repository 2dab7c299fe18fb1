pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod store;

pub use config::Config;
pub use error::{AppError, Result};
pub use models::{Reading, Timing};
pub use store::RelayStore;
