//! Error types for the bh-app service layer.

use std::path::PathBuf;

/// Application error type wrapping the backend crates for the CLI.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to read parameter file: {path}")]
    ParamsFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse parameter file {path}: {message}")]
    ParamsParse { path: PathBuf, message: String },

    #[error("Simulation error: {0}")]
    Simulation(String),

    #[error("Results error: {0}")]
    Results(String),

    #[error("Run not found: {0}")]
    RunNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for bh-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<bh_sim::SimError> for AppError {
    fn from(err: bh_sim::SimError) -> Self {
        AppError::Simulation(err.to_string())
    }
}

impl From<bh_results::ResultsError> for AppError {
    fn from(err: bh_results::ResultsError) -> Self {
        match err {
            bh_results::ResultsError::RunNotFound { run_id } => AppError::RunNotFound(run_id),
            other => AppError::Results(other.to_string()),
        }
    }
}

impl From<bh_core::BhError> for AppError {
    fn from(err: bh_core::BhError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}
