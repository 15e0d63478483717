//! Transient conduction through a brake pad during a stop and the cool-down after it.
//!
//! Provides:
//! - Pad/vehicle parameters and the derived grid, time step, r and Biot number
//! - Tridiagonal assembly for the braking (flux) and cooling (convective) phases
//! - Laasonen (fully implicit) and two-pass half-step time schemes
//! - A braking -> cooling -> done controller that samples the field into a record

pub mod boundary;
pub mod controller;
pub mod error;
pub mod params;
pub mod scheme;
pub mod state;

// Re-exports for public API
pub use boundary::{BoundaryLinearizer, Phase, PhaseParameters};
pub use controller::{
    ControllerState, PhaseController, Sample, SimOptions, SimProgress, SimRecord, run_sim,
    run_sim_with_progress,
};
pub use error::{SimError, SimResult};
pub use params::{Grid, ThermalParameters};
pub use scheme::{Laasonen, SchemeType, TimeStepper, TwoPass};
pub use state::ThermalState;
