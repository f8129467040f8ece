//! Error types for the market impact library

use thiserror::Error;

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// The nonlinear solver could not converge, or too few valid samples
    /// were supplied to attempt a fit
    #[error("Curve fit diverged: {0}")]
    FitDivergence(String),

    /// Precondition violation on caller-supplied data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// CSV parsing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error is a per-instrument fit failure that a driver
    /// loop can skip while continuing with the remaining instruments
    pub fn is_fit_divergence(&self) -> bool {
        matches!(self, Error::FitDivergence(_))
    }
}
