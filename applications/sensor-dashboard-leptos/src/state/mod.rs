pub mod dashboard;
pub mod persistence;

pub use dashboard::{
    parse_consumption, ConnectionStatus, DashboardState, PollOutcome, ReadingMirror,
    POLL_INTERVAL_MS,
};
pub use persistence::{load_state, save_state, BrowserStorage, DurableStore, PersistenceError};
