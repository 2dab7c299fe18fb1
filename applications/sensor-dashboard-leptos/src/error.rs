use thiserror::Error;

/// Errors surfaced to the user by dashboard operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DashboardError {
    #[error("Please enter a valid positive number for unit consumption")]
    InvalidInput,

    #[error("No data to export. Please add some data first.")]
    NothingToExport,

    #[error("CSV export failed: {0}")]
    Csv(String),
}

impl From<csv::Error> for DashboardError {
    fn from(err: csv::Error) -> Self {
        DashboardError::Csv(err.to_string())
    }
}
