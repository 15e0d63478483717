//! Error types for solver operations.

use thiserror::Error;

/// Errors that can occur during a tridiagonal solve.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Singular system: pivot {pivot:e} at row {row}")]
    SingularSystem { row: usize, pivot: f64 },

    #[error("Dimension mismatch: {what} has length {got}, expected {expected}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("Empty system")]
    Empty,

    #[error("Non-finite solution value at row {row}")]
    NonFinite { row: usize },
}

pub type SolverResult<T> = Result<T, SolverError>;
