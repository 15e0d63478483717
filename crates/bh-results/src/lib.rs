//! bh-results: brake trace files and the run cache.

pub mod hash;
pub mod store;
pub mod types;

pub use hash::compute_run_id;
pub use store::{RunStore, TraceStore};
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Run not found: {run_id}")]
    RunNotFound { run_id: String },

    #[error("Unsupported trace format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("Malformed trace: {what}")]
    MalformedTrace { what: String },
}
