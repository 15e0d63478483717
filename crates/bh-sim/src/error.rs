//! Error types for simulation operations.

use crate::boundary::Phase;
use bh_solver::SolverError;
use thiserror::Error;

/// Errors encountered during a brake simulation.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Configuration error: {what}")]
    Configuration { what: String },

    #[error("{scheme} step {step} failed during {phase}: {source}")]
    StepFailed {
        scheme: &'static str,
        phase: Phase,
        step: usize,
        #[source]
        source: SolverError,
    },

    #[error("Step limit of {max_steps} reached during {phase}")]
    StepLimit { phase: Phase, max_steps: usize },
}

pub type SimResult<T> = Result<T, SimError>;

impl From<bh_core::error::BhError> for SimError {
    fn from(e: bh_core::error::BhError) -> Self {
        SimError::Configuration {
            what: e.to_string(),
        }
    }
}
