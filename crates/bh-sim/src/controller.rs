//! Braking -> cooling -> done driver and result recording.

use crate::boundary::{BoundaryLinearizer, Phase};
use crate::error::{SimError, SimResult};
use crate::params::{Grid, ThermalParameters};
use crate::scheme::SchemeType;
use crate::state::{ThermalState, decelerate};
use bh_core::numeric::{ensure_non_negative, ensure_positive};

/// Options for simulation runs.
#[derive(Clone, Debug, PartialEq)]
pub struct SimOptions {
    /// Free cooling time after the vehicle stops (s)
    pub cooling_time_s: f64,
    /// Spacing of recorded samples in simulated time (s)
    pub sample_interval_s: f64,
    /// Report progress every N-th recorded sample
    pub progress_every: usize,
    /// Maximum number of steps (safety limit)
    pub max_steps: usize,
    /// Time scheme (default: Laasonen)
    pub scheme: SchemeType,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            cooling_time_s: 10.0,
            sample_interval_s: 0.1,
            progress_every: 10,
            max_steps: 10_000_000,
            scheme: SchemeType::default(),
        }
    }
}

impl SimOptions {
    pub fn validate(&self) -> SimResult<()> {
        ensure_non_negative(self.cooling_time_s, "cooling_time_s")?;
        ensure_positive(self.sample_interval_s, "sample_interval_s")?;
        if self.progress_every == 0 {
            return Err(SimError::Configuration {
                what: "progress_every must be positive".to_string(),
            });
        }
        if self.max_steps == 0 {
            return Err(SimError::Configuration {
                what: "max_steps must be positive".to_string(),
            });
        }
        Ok(())
    }
}

/// Where the controller is in a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControllerState {
    Braking,
    Cooling,
    Done,
}

/// One recorded snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    pub time_s: f64,
    pub phase: Phase,
    /// Clamped speed after the step (m/s)
    pub speed_m_per_s: f64,
    pub temperature: Vec<f64>,
}

/// Periodic progress report. Emitting it never touches solver state.
#[derive(Clone, Debug)]
pub struct SimProgress {
    pub phase: Phase,
    pub step: usize,
    pub time_s: f64,
    pub speed_m_per_s: f64,
    pub surface_temp_c: f64,
    pub max_temp_c: f64,
    /// Rough share of the run already simulated, in [0, 1]
    pub fraction_complete: f64,
}

/// Record of a finished run.
#[derive(Clone, Debug)]
pub struct SimRecord {
    pub scheme: SchemeType,
    pub samples: Vec<Sample>,
    /// Time at which speed reached zero (s)
    pub stop_time_s: f64,
    pub braking_distance_m: f64,
    pub braking_steps: usize,
    pub cooling_steps: usize,
    /// Hottest point seen at the end of any step (°C) and when (s)
    pub peak_temp_c: f64,
    pub peak_time_s: f64,
    pub final_state: ThermalState,
    pub grid: Grid,
    pub dt_s: f64,
}

impl SimRecord {
    pub fn time_steps(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.time_s).collect()
    }

    pub fn final_max_temp_c(&self) -> f64 {
        self.final_state.max_temperature()
    }
}

/// Owns the run state and steps it through the braking and cooling phases.
pub struct PhaseController {
    linearizer: BoundaryLinearizer,
    grid: Grid,
    options: SimOptions,
    deceleration: f64,
    dt: f64,
    r: f64,
    cooling_steps_total: usize,
    estimated_steps: usize,

    state: ThermalState,
    mode: ControllerState,
    step: usize,
    braking_steps: usize,
    cooling_steps: usize,
    stop_time_s: Option<f64>,
    next_sample: u64,
    samples: Vec<Sample>,
    peak: (f64, f64),
}

impl PhaseController {
    /// Validate parameters and options and set up the state at t = 0.
    pub fn new(params: &ThermalParameters, options: SimOptions) -> SimResult<Self> {
        let grid = params.validate()?;
        options.validate()?;

        let dt = params.time_step();
        let cooling_steps_total = steps_to_cover(options.cooling_time_s, dt);
        let braking_estimate = if params.initial_speed_m_per_s > 0.0 {
            steps_to_cover(
                params.initial_speed_m_per_s / params.deceleration_m_per_s2,
                dt,
            )
        } else {
            0
        };

        tracing::debug!(
            points = grid.points(),
            dx_m = grid.spacing(),
            dt_s = dt,
            r = params.stability_ratio(),
            biot = params.biot(),
            scheme = options.scheme.name(),
            "brake run configured"
        );

        let state = ThermalState::initial(params, &grid);
        let peak = (state.max_temperature(), 0.0);
        let (mode, stop_time_s) = if state.speed_m_per_s > 0.0 {
            (ControllerState::Braking, None)
        } else {
            let mode = if cooling_steps_total > 0 {
                ControllerState::Cooling
            } else {
                ControllerState::Done
            };
            (mode, Some(0.0))
        };

        Ok(Self {
            linearizer: BoundaryLinearizer::new(params, &grid),
            grid,
            deceleration: params.deceleration_m_per_s2,
            dt,
            r: params.stability_ratio(),
            cooling_steps_total,
            estimated_steps: braking_estimate + cooling_steps_total,
            options,
            state,
            mode,
            step: 0,
            braking_steps: 0,
            cooling_steps: 0,
            stop_time_s,
            next_sample: 0,
            samples: Vec::new(),
            peak,
        })
    }

    pub fn mode(&self) -> ControllerState {
        self.mode
    }

    pub fn state(&self) -> &ThermalState {
        &self.state
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn stop_time_s(&self) -> Option<f64> {
        self.stop_time_s
    }

    /// Pure braking update: new field from the speed at the start of the step,
    /// then decelerate, integrate distance with the clamped speed, advance time.
    pub fn braking_step(&self, state: &ThermalState, step: usize) -> SimResult<ThermalState> {
        let temperature = self.solve(state, Phase::Braking, step)?;
        let speed = decelerate(state.speed_m_per_s, self.deceleration, self.dt);
        Ok(ThermalState {
            temperature,
            time_s: (step + 1) as f64 * self.dt,
            speed_m_per_s: speed,
            distance_m: state.distance_m + speed * self.dt,
        })
    }

    /// Pure cooling update: both faces convect, kinematics frozen.
    pub fn cooling_step(&self, state: &ThermalState, step: usize) -> SimResult<ThermalState> {
        let temperature = self.solve(state, Phase::Cooling, step)?;
        Ok(ThermalState {
            temperature,
            time_s: (step + 1) as f64 * self.dt,
            speed_m_per_s: state.speed_m_per_s,
            distance_m: state.distance_m,
        })
    }

    fn solve(&self, state: &ThermalState, phase: Phase, step: usize) -> SimResult<Vec<f64>> {
        let scheme = self.options.scheme;
        scheme
            .step(
                &self.linearizer,
                &state.temperature,
                phase,
                state.speed_m_per_s,
                self.r,
            )
            .map_err(|source| {
                tracing::warn!(%phase, step, scheme = scheme.name(), "step aborted: {source}");
                SimError::StepFailed {
                    scheme: scheme.name(),
                    phase,
                    step,
                    source,
                }
            })
    }

    /// Take one step in the current phase. Returns the phase afterwards.
    ///
    /// Once `Done`, further calls change nothing.
    pub fn advance(&mut self) -> SimResult<ControllerState> {
        self.advance_sampled().map(|_| self.mode)
    }

    /// Like [`advance`](Self::advance) but reports whether a sample was recorded.
    fn advance_sampled(&mut self) -> SimResult<bool> {
        let phase = match self.mode {
            ControllerState::Done => return Ok(false),
            ControllerState::Braking => Phase::Braking,
            ControllerState::Cooling => Phase::Cooling,
        };
        if self.step >= self.options.max_steps {
            return Err(SimError::StepLimit {
                phase,
                max_steps: self.options.max_steps,
            });
        }

        let next = match phase {
            Phase::Braking => self.braking_step(&self.state, self.step)?,
            Phase::Cooling => self.cooling_step(&self.state, self.step)?,
        };
        self.state = next;
        self.step += 1;

        let max_temp = self.state.max_temperature();
        if max_temp > self.peak.0 {
            self.peak = (max_temp, self.state.time_s);
        }

        let sampled = self.record_sample(phase);

        match phase {
            Phase::Braking => {
                self.braking_steps += 1;
                if self.state.speed_m_per_s <= 0.0 {
                    self.stop_time_s = Some(self.state.time_s);
                    tracing::info!(
                        stop_time_s = self.state.time_s,
                        braking_distance_m = self.state.distance_m,
                        max_temp_c = max_temp,
                        "vehicle stopped"
                    );
                    self.mode = if self.cooling_steps_total > 0 {
                        ControllerState::Cooling
                    } else {
                        ControllerState::Done
                    };
                }
            }
            Phase::Cooling => {
                self.cooling_steps += 1;
                if self.cooling_steps >= self.cooling_steps_total {
                    self.mode = ControllerState::Done;
                }
            }
        }
        if self.mode == ControllerState::Done {
            tracing::info!(
                time_s = self.state.time_s,
                max_temp_c = max_temp,
                "cooling finished"
            );
        }

        Ok(sampled)
    }

    /// Append a snapshot when time has crossed the next multiple of the interval.
    fn record_sample(&mut self, phase: Phase) -> bool {
        let interval = self.options.sample_interval_s;
        let t = self.state.time_s;
        if t < self.next_sample as f64 * interval {
            return false;
        }
        self.samples.push(Sample {
            time_s: t,
            phase,
            speed_m_per_s: self.state.speed_m_per_s,
            temperature: self.state.temperature.clone(),
        });
        let mut next = ((t / interval).floor() as u64).saturating_add(1);
        // The quotient can round across an integer either way.
        if next as f64 * interval <= t {
            next = next.saturating_add(1);
        } else if next > 1 && (next - 1) as f64 * interval > t {
            next -= 1;
        }
        self.next_sample = next.max(self.next_sample.saturating_add(1));
        true
    }

    fn progress(&self) -> SimProgress {
        let phase = match self.mode {
            ControllerState::Braking => Phase::Braking,
            _ => Phase::Cooling,
        };
        SimProgress {
            phase,
            step: self.step,
            time_s: self.state.time_s,
            speed_m_per_s: self.state.speed_m_per_s,
            surface_temp_c: self.state.surface_temperature(),
            max_temp_c: self.state.max_temperature(),
            fraction_complete: (self.step as f64 / self.estimated_steps.max(1) as f64).min(1.0),
        }
    }

    /// Step until `Done` and hand back the record.
    pub fn run(self) -> SimResult<SimRecord> {
        self.run_with_progress(None)
    }

    pub fn run_with_progress(
        mut self,
        mut on_progress: Option<&mut dyn FnMut(&SimProgress)>,
    ) -> SimResult<SimRecord> {
        while self.mode != ControllerState::Done {
            let sampled = self.advance_sampled()?;
            if sampled && self.samples.len() % self.options.progress_every == 0 {
                let progress = self.progress();
                tracing::info!(
                    phase = %progress.phase,
                    time_s = progress.time_s,
                    speed_m_per_s = progress.speed_m_per_s,
                    max_temp_c = progress.max_temp_c,
                    "progress"
                );
                if let Some(cb) = on_progress.as_deref_mut() {
                    cb(&progress);
                }
            }
        }
        Ok(self.into_record())
    }

    fn into_record(self) -> SimRecord {
        SimRecord {
            scheme: self.options.scheme,
            samples: self.samples,
            stop_time_s: self.stop_time_s.unwrap_or(self.state.time_s),
            braking_distance_m: self.state.distance_m,
            braking_steps: self.braking_steps,
            cooling_steps: self.cooling_steps,
            peak_temp_c: self.peak.0,
            peak_time_s: self.peak.1,
            final_state: self.state,
            grid: self.grid,
            dt_s: self.dt,
        }
    }
}

/// Number of `dt` steps needed for the elapsed time to reach `duration`.
fn steps_to_cover(duration: f64, dt: f64) -> usize {
    if duration <= 0.0 {
        return 0;
    }
    // Ratios such as 1.0 / 0.1 can land a hair above the integer they mean.
    (duration / dt - 1e-9).ceil().max(0.0) as usize
}

/// Run a complete brake simulation.
pub fn run_sim(params: &ThermalParameters, opts: &SimOptions) -> SimResult<SimRecord> {
    PhaseController::new(params, opts.clone())?.run()
}

/// Run a complete brake simulation, reporting progress every `progress_every` samples.
pub fn run_sim_with_progress(
    params: &ThermalParameters,
    opts: &SimOptions,
    on_progress: &mut dyn FnMut(&SimProgress),
) -> SimResult<SimRecord> {
    PhaseController::new(params, opts.clone())?.run_with_progress(Some(on_progress))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_options_defaults() {
        let opts = SimOptions::default();
        assert_eq!(opts.cooling_time_s, 10.0);
        assert_eq!(opts.sample_interval_s, 0.1);
        assert_eq!(opts.progress_every, 10);
        assert_eq!(opts.scheme, SchemeType::Implicit);
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn sim_options_invalid() {
        let opts = SimOptions {
            sample_interval_s: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            PhaseController::new(&ThermalParameters::default(), opts),
            Err(SimError::Configuration { .. })
        ));
        let opts = SimOptions {
            cooling_time_s: -1.0,
            ..Default::default()
        };
        assert!(opts.validate().is_err());
    }

    #[test]
    fn steps_to_cover_rounds_up() {
        assert_eq!(steps_to_cover(10.0, 0.16), 63);
        assert_eq!(steps_to_cover(1.0, 0.1), 10);
        assert_eq!(steps_to_cover(0.0, 0.1), 0);
    }

    #[test]
    fn parked_vehicle_starts_cooling() {
        let params = ThermalParameters {
            initial_speed_m_per_s: 0.0,
            ..Default::default()
        };
        let ctl = PhaseController::new(&params, SimOptions::default()).unwrap();
        assert_eq!(ctl.mode(), ControllerState::Cooling);
        assert_eq!(ctl.stop_time_s(), Some(0.0));
    }

    #[test]
    fn done_is_terminal() {
        let opts = SimOptions {
            cooling_time_s: 0.0,
            ..Default::default()
        };
        let mut ctl = PhaseController::new(&ThermalParameters::default(), opts).unwrap();
        while ctl.advance().unwrap() != ControllerState::Done {}
        let frozen = ctl.state().clone();
        let samples = ctl.samples().len();
        assert_eq!(ctl.advance().unwrap(), ControllerState::Done);
        assert_eq!(ctl.state(), &frozen);
        assert_eq!(ctl.samples().len(), samples);
    }

    #[test]
    fn tiny_interval_samples_every_step() {
        let opts = SimOptions {
            cooling_time_s: 0.0,
            sample_interval_s: 1e-10,
            ..Default::default()
        };
        let rec = run_sim(&ThermalParameters::default(), &opts).unwrap();
        assert_eq!(rec.braking_steps, 53);
        assert_eq!(rec.samples.len(), rec.braking_steps);
        for w in rec.samples.windows(2) {
            assert!(w[1].time_s > w[0].time_s);
        }
    }

    #[test]
    fn step_limit_is_reported() {
        let opts = SimOptions {
            max_steps: 5,
            ..Default::default()
        };
        let err = run_sim(&ThermalParameters::default(), &opts).unwrap_err();
        assert!(matches!(
            err,
            SimError::StepLimit {
                phase: Phase::Braking,
                max_steps: 5
            }
        ));
    }
}
