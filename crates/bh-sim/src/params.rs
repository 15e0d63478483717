//! Physical and numerical parameters of the brake pad model.

use crate::error::{SimError, SimResult};
use bh_core::numeric::{Tolerances, ensure_non_negative, ensure_positive, nearly_equal};
use bh_core::units::{self, Length, Time};
use serde::{Deserialize, Serialize};

/// Thickness must be this close to a whole number of grid spacings.
const GRID_FIT_TOL: f64 = 1e-6;

/// Fewest grid points that leave an interior row between the two boundaries.
const MIN_POINTS: usize = 3;

/// Largest grid accepted; one row of the tridiagonal system per point.
const MAX_POINTS: usize = 1_000_000;

/// Pad, vehicle and discretisation constants for one run.
///
/// Defaults describe a 2 cm pad on a 100 kg vehicle braking from 25 m/s at 3 m/s².
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThermalParameters {
    /// Vehicle mass (kg), carried for reporting only
    pub vehicle_mass_kg: f64,
    /// Mass reduced onto one braking surface (kg)
    pub reduced_mass_kg: f64,
    /// Pad thickness (m)
    pub thickness_m: f64,
    /// Thermal conductivity λ (W/(m·K))
    pub conductivity_w_per_m_k: f64,
    /// Thermal diffusivity a (m²/s)
    pub diffusivity_m2_per_s: f64,
    /// Convection coefficient α (W/(m²·K))
    pub convection_w_per_m2_k: f64,
    /// Speed at the start of braking (m/s)
    pub initial_speed_m_per_s: f64,
    /// Constant deceleration (m/s²)
    pub deceleration_m_per_s2: f64,
    /// Uniform pad temperature at t = 0 (°C)
    pub initial_temp_c: f64,
    /// Ambient air temperature (°C)
    pub ambient_temp_c: f64,
    /// Grid spacing (m)
    pub dx_m: f64,
    /// Time step override (s). `None` selects dx²/(2a), i.e. r = 0.5.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_step_s: Option<f64>,
}

impl Default for ThermalParameters {
    fn default() -> Self {
        Self {
            vehicle_mass_kg: 100.0,
            reduced_mass_kg: 45.4,
            thickness_m: 0.02,
            conductivity_w_per_m_k: 0.2,
            diffusivity_m2_per_s: 12.5e-6,
            convection_w_per_m2_k: 40.0,
            initial_speed_m_per_s: 25.0,
            deceleration_m_per_s2: 3.0,
            initial_temp_c: 25.0,
            ambient_temp_c: 25.0,
            dx_m: 0.002,
            time_step_s: None,
        }
    }
}

impl ThermalParameters {
    /// Same parameters with an explicit time step.
    pub fn with_time_step(mut self, dt_s: f64) -> Self {
        self.time_step_s = Some(dt_s);
        self
    }

    /// Check every constant and derive the grid.
    ///
    /// Rejects non-positive spacing, diffusivity, conductivity, thickness or
    /// time step, negative convection/mass/speed/deceleration, a braking run
    /// that could never stop, and a thickness that is not a whole number of
    /// spacings.
    pub fn validate(&self) -> SimResult<Grid> {
        let dx = ensure_positive(self.dx_m, "dx_m")?;
        ensure_positive(self.diffusivity_m2_per_s, "diffusivity_m2_per_s")?;
        ensure_positive(self.conductivity_w_per_m_k, "conductivity_w_per_m_k")?;
        let thickness = ensure_positive(self.thickness_m, "thickness_m")?;
        ensure_positive(self.time_step(), "time_step_s")?;
        ensure_non_negative(self.convection_w_per_m2_k, "convection_w_per_m2_k")?;
        ensure_non_negative(self.reduced_mass_kg, "reduced_mass_kg")?;
        ensure_non_negative(self.vehicle_mass_kg, "vehicle_mass_kg")?;
        let v0 = ensure_non_negative(self.initial_speed_m_per_s, "initial_speed_m_per_s")?;
        let u = ensure_non_negative(self.deceleration_m_per_s2, "deceleration_m_per_s2")?;
        bh_core::numeric::ensure_finite(self.initial_temp_c, "initial_temp_c")?;
        bh_core::numeric::ensure_finite(self.ambient_temp_c, "ambient_temp_c")?;

        if v0 > 0.0 && u == 0.0 {
            return Err(SimError::Configuration {
                what: "deceleration_m_per_s2 must be positive when initial speed is non-zero"
                    .to_string(),
            });
        }

        let intervals = thickness / dx;
        let fit = Tolerances {
            abs: GRID_FIT_TOL,
            rel: GRID_FIT_TOL,
        };
        if !nearly_equal(intervals, intervals.round(), fit) {
            return Err(SimError::Configuration {
                what: format!(
                    "thickness {thickness} m is not a whole number of {dx} m spacings"
                ),
            });
        }
        if intervals.round() >= MAX_POINTS as f64 {
            return Err(SimError::Configuration {
                what: format!(
                    "grid of {thickness} m at {dx} m spacing exceeds {MAX_POINTS} points"
                ),
            });
        }
        let n = intervals.round() as usize + 1;
        if n < MIN_POINTS {
            return Err(SimError::Configuration {
                what: format!("grid needs at least {MIN_POINTS} points, got {n}"),
            });
        }

        Ok(Grid { n, dx })
    }

    /// Full time step Δt (s).
    pub fn time_step(&self) -> f64 {
        self.time_step_s
            .unwrap_or(self.dx_m * self.dx_m / (2.0 * self.diffusivity_m2_per_s))
    }

    /// Half step Δt/2 used by each pass of the two-pass scheme (s).
    pub fn half_step(&self) -> f64 {
        0.5 * self.time_step()
    }

    /// r = a·Δt/Δx² for the full step.
    pub fn stability_ratio(&self) -> f64 {
        self.diffusivity_m2_per_s * self.time_step() / (self.dx_m * self.dx_m)
    }

    /// r' = a·(Δt/2)/Δx².
    pub fn half_stability_ratio(&self) -> f64 {
        self.diffusivity_m2_per_s * self.half_step() / (self.dx_m * self.dx_m)
    }

    /// Bi = α·Δx/λ.
    pub fn biot(&self) -> f64 {
        self.convection_w_per_m2_k * self.dx_m / self.conductivity_w_per_m_k
    }

    /// Q(V) = m_r·u·V/(2λ), the surface temperature gradient imposed by braking (K/m).
    pub fn heat_flux(&self, speed_m_per_s: f64) -> f64 {
        self.reduced_mass_kg * self.deceleration_m_per_s2 * speed_m_per_s
            / (2.0 * self.conductivity_w_per_m_k)
    }

    /// Closed-form stopping time V0/u, `None` when the vehicle never moves.
    pub fn ideal_stop_time(&self) -> Option<Time> {
        (self.initial_speed_m_per_s > 0.0 && self.deceleration_m_per_s2 > 0.0).then(|| {
            units::stopping_time(
                units::mps(self.initial_speed_m_per_s),
                units::mps2(self.deceleration_m_per_s2),
            )
        })
    }

    /// Closed-form stopping distance V0²/(2u).
    pub fn ideal_stop_distance(&self) -> Option<Length> {
        (self.deceleration_m_per_s2 > 0.0).then(|| {
            units::stopping_distance(
                units::mps(self.initial_speed_m_per_s),
                units::mps2(self.deceleration_m_per_s2),
            )
        })
    }

    pub fn thickness(&self) -> Length {
        units::m(self.thickness_m)
    }

    pub fn dt(&self) -> Time {
        units::s(self.time_step())
    }
}

/// Uniform 1-D grid through the pad. Index 0 is the braking surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Grid {
    n: usize,
    dx: f64,
}

impl Grid {
    /// Number of grid points N.
    pub fn points(&self) -> usize {
        self.n
    }

    pub fn spacing(&self) -> f64 {
        self.dx
    }

    /// L = (N-1)·Δx
    pub fn length(&self) -> f64 {
        (self.n - 1) as f64 * self.dx
    }

    /// Point positions measured from the braking surface (m).
    pub fn coords(&self) -> Vec<f64> {
        (0..self.n).map(|i| i as f64 * self.dx).collect()
    }
}
