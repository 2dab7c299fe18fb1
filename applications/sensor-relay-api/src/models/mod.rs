pub mod reading;

pub use reading::{IngestResponse, Reading, ReadingUpdate, Timing};
