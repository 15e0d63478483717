//! Implicit time schemes for one step of the pad temperature field.

use crate::boundary::{BoundaryLinearizer, Phase};
use bh_solver::SolverResult;
use serde::{Deserialize, Serialize};

/// Trait for time-stepping schemes.
pub trait TimeStepper {
    /// Short name used in trace files and error reports.
    fn name(&self) -> &'static str;

    /// Advance `t_prev` by one full step whose stability ratio is `r`.
    fn step(
        &self,
        linearizer: &BoundaryLinearizer,
        t_prev: &[f64],
        phase: Phase,
        speed_m_per_s: f64,
        r: f64,
    ) -> SolverResult<Vec<f64>>;
}

/// Fully implicit backward Euler (Laasonen): one solve per step, first order in time.
#[derive(Clone, Debug)]
pub struct Laasonen;

impl TimeStepper for Laasonen {
    fn name(&self) -> &'static str {
        "implicit"
    }

    fn step(
        &self,
        linearizer: &BoundaryLinearizer,
        t_prev: &[f64],
        phase: Phase,
        speed_m_per_s: f64,
        r: f64,
    ) -> SolverResult<Vec<f64>> {
        step_implicit(linearizer, t_prev, phase, speed_m_per_s, r)
    }
}

/// Two sequential implicit solves over Δt/2 each.
///
/// Both passes use the same 1-D stencil and the speed at the start of the step;
/// this is a half-step correction, not an alternating-direction sweep.
#[derive(Clone, Debug)]
pub struct TwoPass;

impl TimeStepper for TwoPass {
    fn name(&self) -> &'static str {
        "two-pass"
    }

    fn step(
        &self,
        linearizer: &BoundaryLinearizer,
        t_prev: &[f64],
        phase: Phase,
        speed_m_per_s: f64,
        r: f64,
    ) -> SolverResult<Vec<f64>> {
        step_two_pass(linearizer, t_prev, phase, speed_m_per_s, 0.5 * r)
    }
}

/// One build + one solve at ratio `r`.
pub fn step_implicit(
    linearizer: &BoundaryLinearizer,
    t_prev: &[f64],
    phase: Phase,
    speed_m_per_s: f64,
    r: f64,
) -> SolverResult<Vec<f64>> {
    linearizer.build(t_prev, phase, speed_m_per_s, r).solve()
}

/// Build + solve to an intermediate field, then again from it, both at `r_half`.
pub fn step_two_pass(
    linearizer: &BoundaryLinearizer,
    t_prev: &[f64],
    phase: Phase,
    speed_m_per_s: f64,
    r_half: f64,
) -> SolverResult<Vec<f64>> {
    let t_half = linearizer
        .build(t_prev, phase, speed_m_per_s, r_half)
        .solve()?;
    linearizer
        .build(&t_half, phase, speed_m_per_s, r_half)
        .solve()
}

/// Scheme selection for a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchemeType {
    /// Laasonen, one solve per step (default).
    #[default]
    Implicit,
    /// Two half-step solves per step.
    TwoPass,
}

impl SchemeType {
    pub const ALL: [SchemeType; 2] = [SchemeType::Implicit, SchemeType::TwoPass];

    pub fn name(self) -> &'static str {
        match self {
            SchemeType::Implicit => Laasonen.name(),
            SchemeType::TwoPass => TwoPass.name(),
        }
    }

    /// Human-facing method label written into trace files.
    pub fn method_label(self) -> &'static str {
        match self {
            SchemeType::Implicit => "Laasonen",
            SchemeType::TwoPass => "ADI",
        }
    }

    /// Solves performed per simulated step.
    pub fn solves_per_step(self) -> usize {
        match self {
            SchemeType::Implicit => 1,
            SchemeType::TwoPass => 2,
        }
    }

    pub fn step(
        self,
        linearizer: &BoundaryLinearizer,
        t_prev: &[f64],
        phase: Phase,
        speed_m_per_s: f64,
        r: f64,
    ) -> SolverResult<Vec<f64>> {
        match self {
            SchemeType::Implicit => Laasonen.step(linearizer, t_prev, phase, speed_m_per_s, r),
            SchemeType::TwoPass => TwoPass.step(linearizer, t_prev, phase, speed_m_per_s, r),
        }
    }
}
