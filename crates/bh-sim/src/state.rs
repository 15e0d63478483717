//! Mutable state of a single brake run.

use crate::params::{Grid, ThermalParameters};
use bh_core::numeric::max_value;

/// Temperature field plus vehicle kinematics at one instant.
#[derive(Clone, Debug, PartialEq)]
pub struct ThermalState {
    /// Temperature per grid point (°C); index 0 is the braking surface
    pub temperature: Vec<f64>,
    /// Simulated time (s)
    pub time_s: f64,
    /// Vehicle speed (m/s), never negative
    pub speed_m_per_s: f64,
    /// Distance covered since braking began (m)
    pub distance_m: f64,
}

impl ThermalState {
    /// State at t = 0: uniform initial temperature, full speed, no distance.
    pub fn initial(params: &ThermalParameters, grid: &Grid) -> Self {
        Self {
            temperature: vec![params.initial_temp_c; grid.points()],
            time_s: 0.0,
            speed_m_per_s: params.initial_speed_m_per_s,
            distance_m: 0.0,
        }
    }

    pub fn max_temperature(&self) -> f64 {
        max_value(&self.temperature)
    }

    pub fn surface_temperature(&self) -> f64 {
        self.temperature[0]
    }
}

/// Speed after decelerating for `dt_s`, clamped at zero.
pub(crate) fn decelerate(speed_m_per_s: f64, deceleration_m_per_s2: f64, dt_s: f64) -> f64 {
    (speed_m_per_s - deceleration_m_per_s2 * dt_s).max(0.0)
}
