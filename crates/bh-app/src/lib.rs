//! Application service layer for brakeheat.
//!
//! Ties the simulation to trace storage: parameter files, cached runs,
//! progress reporting, scheme comparison and trace queries. The CLI is a thin
//! shell over this crate.

pub mod compare;
pub mod error;
pub mod progress;
pub mod query;
pub mod run_service;

// Re-export key types for convenience
pub use compare::{SchemeComparison, compare_schemes};
pub use error::{AppError, AppResult};
pub use progress::{RunProgressEvent, RunStage, SimulationProgress};
pub use query::{
    TraceSummary, get_trace_summary, max_temperature_series, nearest_sample, profile_at,
    surface_temperature_series,
};
pub use run_service::{
    RunOptions, RunRequest, RunResponse, ensure_run, ensure_run_with_progress, list_runs,
    load_params, load_run, load_trace, write_trace,
};
