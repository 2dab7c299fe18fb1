pub mod history;
pub mod reading;

pub use history::{HistoryEntry, UnitConsumption};
pub use reading::{Reading, Timing};
