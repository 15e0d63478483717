//! Tridiagonal assembly for the two boundary regimes of the pad.
//!
//! Interior rows carry the implicit central-difference stencil
//! `-r·T[i-1] + (1+2r)·T[i] - r·T[i+1] = T_old[i]`. The two boundary rows come
//! from a ghost point one spacing outside the pad, eliminated with the
//! boundary condition:
//!
//! - prescribed gradient Q at the braking surface, `T[-1] = T[1] + 2·Δx·Q`:
//!   `(1+2r)·T[0] - 2r·T[1] = T_old[0] + 2r·Δx·Q`
//! - convection to ambient, `T[N] = T[N-2] - 2·Bi·(T[N-1] - T_amb)`:
//!   `-2r·T[N-2] + (1+2r(1+Bi))·T[N-1] = T_old[N-1] + 2r·Bi·T_amb`
//!
//! During cooling the braking surface uses the convective row mirrored.

use crate::params::{Grid, ThermalParameters};
use bh_solver::TridiagonalSystem;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Boundary regime at the braking surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Friction heat enters at index 0, far side convects.
    Braking,
    /// Both faces convect to ambient.
    Cooling,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::Braking => "braking",
            Phase::Cooling => "cooling",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Scalars that fix one assembled system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseParameters {
    /// r = a·Δt/Δx² for the increment being solved
    pub r: f64,
    /// Bi = α·Δx/λ
    pub biot: f64,
    /// Surface gradient Q(V) (K/m); zero while cooling
    pub heat_flux: f64,
}

/// Builds a fresh [`TridiagonalSystem`] for every solve.
#[derive(Clone, Debug)]
pub struct BoundaryLinearizer {
    n: usize,
    dx: f64,
    biot: f64,
    ambient_c: f64,
    params: ThermalParameters,
}

impl BoundaryLinearizer {
    pub fn new(params: &ThermalParameters, grid: &Grid) -> Self {
        Self {
            n: grid.points(),
            dx: grid.spacing(),
            biot: params.biot(),
            ambient_c: params.ambient_temp_c,
            params: params.clone(),
        }
    }

    pub fn points(&self) -> usize {
        self.n
    }

    /// Scalars for `phase` at ratio `r`; the speed only matters while braking.
    pub fn phase_parameters(&self, phase: Phase, speed_m_per_s: f64, r: f64) -> PhaseParameters {
        let heat_flux = match phase {
            Phase::Braking => self.params.heat_flux(speed_m_per_s),
            Phase::Cooling => 0.0,
        };
        PhaseParameters {
            r,
            biot: self.biot,
            heat_flux,
        }
    }

    /// Assemble the system advancing `t_prev` by one increment of ratio `r`.
    ///
    /// `t_prev` must hold exactly one value per grid point.
    pub fn build(
        &self,
        t_prev: &[f64],
        phase: Phase,
        speed_m_per_s: f64,
        r: f64,
    ) -> TridiagonalSystem {
        debug_assert_eq!(t_prev.len(), self.n);
        let pp = self.phase_parameters(phase, speed_m_per_s, r);
        let n = self.n;
        let r = pp.r;
        let bi = pp.biot;
        let mut sys = TridiagonalSystem::zeros(n);

        for i in 1..n - 1 {
            sys.sub[i] = -r;
            sys.diag[i] = 1.0 + 2.0 * r;
            sys.sup[i] = -r;
            sys.rhs[i] = t_prev[i];
        }

        sys.sub[0] = 0.0;
        sys.sup[0] = -2.0 * r;
        match phase {
            Phase::Braking => {
                sys.diag[0] = 1.0 + 2.0 * r;
                sys.rhs[0] = t_prev[0] + 2.0 * r * self.dx * pp.heat_flux;
            }
            Phase::Cooling => {
                sys.diag[0] = 1.0 + 2.0 * r * (1.0 + bi);
                sys.rhs[0] = t_prev[0] + 2.0 * r * bi * self.ambient_c;
            }
        }

        sys.sub[n - 1] = -2.0 * r;
        sys.diag[n - 1] = 1.0 + 2.0 * r * (1.0 + bi);
        sys.sup[n - 1] = 0.0;
        sys.rhs[n - 1] = t_prev[n - 1] + 2.0 * r * bi * self.ambient_c;

        sys
    }

    /// Flux at the braking surface, convection on the far side.
    pub fn build_braking(&self, t_prev: &[f64], speed_m_per_s: f64, r: f64) -> TridiagonalSystem {
        self.build(t_prev, Phase::Braking, speed_m_per_s, r)
    }

    /// Convection on both faces.
    pub fn build_cooling(&self, t_prev: &[f64], r: f64) -> TridiagonalSystem {
        self.build(t_prev, Phase::Cooling, 0.0, r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pad() -> (ThermalParameters, BoundaryLinearizer) {
        let p = ThermalParameters::default();
        let grid = p.validate().unwrap();
        let lin = BoundaryLinearizer::new(&p, &grid);
        (p, lin)
    }

    #[test]
    fn braking_rows() {
        let (p, lin) = pad();
        let t_prev: Vec<f64> = (0..11).map(|i| 25.0 + i as f64).collect();
        let r = p.stability_ratio();
        let bi = p.biot();
        let q = p.heat_flux(20.0);
        let sys = lin.build_braking(&t_prev, 20.0, r);

        assert_eq!(sys.len(), 11);
        assert_eq!(
            (sys.sub[0], sys.diag[0], sys.sup[0]),
            (0.0, 1.0 + 2.0 * r, -2.0 * r)
        );
        assert_eq!(sys.rhs[0], t_prev[0] + 2.0 * r * p.dx_m * q);

        for i in 1..10 {
            assert_eq!((sys.sub[i], sys.diag[i], sys.sup[i]), (-r, 1.0 + 2.0 * r, -r));
            assert_eq!(sys.rhs[i], t_prev[i]);
        }

        assert_eq!(
            (sys.sub[10], sys.diag[10], sys.sup[10]),
            (-2.0 * r, 1.0 + 2.0 * r * (1.0 + bi), 0.0)
        );
        assert_eq!(sys.rhs[10], t_prev[10] + 2.0 * r * bi * p.ambient_temp_c);
    }

    #[test]
    fn cooling_rows_mirror_the_far_face() {
        let (p, lin) = pad();
        let t_prev = vec![60.0; 11];
        let r = p.stability_ratio();
        let bi = p.biot();
        let sys = lin.build_cooling(&t_prev, r);

        assert_eq!(sys.diag[0], sys.diag[10]);
        assert_eq!(sys.diag[0], 1.0 + 2.0 * r * (1.0 + bi));
        assert_eq!(sys.sup[0], sys.sub[10]);
        assert_eq!(sys.rhs[0], 60.0 + 2.0 * r * bi * p.ambient_temp_c);
        assert_eq!(sys.rhs[0], sys.rhs[10]);
    }

    #[test]
    fn systems_are_diagonally_dominant() {
        let (p, lin) = pad();
        let t_prev = vec![25.0; 11];
        for r in [p.stability_ratio(), p.half_stability_ratio(), 10.0] {
            assert!(lin.build_braking(&t_prev, 25.0, r).is_diagonally_dominant());
            assert!(lin.build_cooling(&t_prev, r).is_diagonally_dominant());
        }
    }

    #[test]
    fn cooling_ignores_speed() {
        let (p, lin) = pad();
        let pp = lin.phase_parameters(Phase::Cooling, 25.0, p.stability_ratio());
        assert_eq!(pp.heat_flux, 0.0);
        let braking = lin.phase_parameters(Phase::Braking, 25.0, p.stability_ratio());
        assert_eq!(braking.heat_flux, p.heat_flux(25.0));
        assert_eq!(braking.biot, pp.biot);
    }

    #[test]
    fn rebuild_does_not_leak_previous_phase() {
        let (p, lin) = pad();
        let t_prev = vec![40.0; 11];
        let r = p.stability_ratio();
        let _ = lin.build_braking(&t_prev, 25.0, r);
        let cooling = lin.build_cooling(&t_prev, r);
        assert_eq!(cooling, lin.build_cooling(&t_prev, r));
        assert_ne!(cooling.diag[0], 1.0 + 2.0 * r);
    }
}
