//! Result data types.

use bh_sim::{Phase, SchemeType, SimOptions, SimRecord, ThermalParameters};
use serde::{Deserialize, Serialize};

use crate::{ResultsError, ResultsResult};

/// Version written into every trace; bumped on incompatible layout changes.
pub const FORMAT_VERSION: u32 = 1;

pub type RunId = String;

/// The run options that change the answer, i.e. everything hashed into a run id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub scheme: SchemeType,
    pub cooling_time_s: f64,
    pub sample_interval_s: f64,
}

impl RunConfig {
    pub fn from_options(opts: &SimOptions) -> Self {
        Self {
            scheme: opts.scheme,
            cooling_time_s: opts.cooling_time_s,
            sample_interval_s: opts.sample_interval_s,
        }
    }

    pub fn to_options(&self) -> SimOptions {
        SimOptions {
            scheme: self.scheme,
            cooling_time_s: self.cooling_time_s,
            sample_interval_s: self.sample_interval_s,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: RunId,
    /// RFC 3339
    pub timestamp: String,
    pub method: String,
    pub config: RunConfig,
    pub solver_version: String,
    pub format_version: u32,
}

impl RunManifest {
    /// Manifest stamped with the current UTC time.
    pub fn new(run_id: RunId, config: RunConfig, solver_version: &str) -> Self {
        Self {
            run_id,
            timestamp: chrono::Utc::now().to_rfc3339(),
            method: config.scheme.method_label().to_string(),
            config,
            solver_version: solver_version.to_string(),
            format_version: FORMAT_VERSION,
        }
    }
}

/// Discretisation summary plus the full parameter set the run used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceParameters {
    #[serde(rename = "N")]
    pub points: usize,
    pub dx: f64,
    pub dt: f64,
    pub dt_half: f64,
    #[serde(rename = "L")]
    pub thickness: f64,
    #[serde(rename = "a")]
    pub diffusivity: f64,
    #[serde(rename = "V0")]
    pub initial_speed: f64,
    #[serde(rename = "u")]
    pub deceleration: f64,
    pub r: f64,
    /// Ratio each two-pass half step solves with.
    pub r_half: f64,
    pub biot: f64,
    pub pad: ThermalParameters,
}

impl TraceParameters {
    pub fn new(params: &ThermalParameters, record: &SimRecord) -> Self {
        Self {
            points: record.grid.points(),
            dx: record.grid.spacing(),
            dt: record.dt_s,
            dt_half: 0.5 * record.dt_s,
            thickness: record.grid.length(),
            diffusivity: params.diffusivity_m2_per_s,
            initial_speed: params.initial_speed_m_per_s,
            deceleration: params.deceleration_m_per_s2,
            r: params.stability_ratio(),
            r_half: params.half_stability_ratio(),
            biot: params.biot(),
            pad: params.clone(),
        }
    }
}

/// Everything a finished brake run leaves behind, in the on-disk layout.
///
/// `time_steps`, `temp_data`, `speed` and `phase` are parallel per-sample
/// series; every row of `temp_data` has one value per entry of `x_coords`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrakeTrace {
    pub format_version: u32,
    pub method: String,
    pub scheme: SchemeType,
    pub time_steps: Vec<f64>,
    pub temp_data: Vec<Vec<f64>>,
    pub speed: Vec<f64>,
    pub phase: Vec<Phase>,
    pub stop_time: f64,
    pub braking_distance: f64,
    pub final_temp: Vec<f64>,
    pub x_coords: Vec<f64>,
    pub parameters: TraceParameters,
    pub peak_temperature: f64,
    pub peak_time: f64,
    #[serde(default)]
    pub braking_steps: usize,
    #[serde(default)]
    pub cooling_steps: usize,
}

impl BrakeTrace {
    pub fn from_record(record: &SimRecord, params: &ThermalParameters) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            method: record.scheme.method_label().to_string(),
            scheme: record.scheme,
            time_steps: record.time_steps(),
            temp_data: record
                .samples
                .iter()
                .map(|s| s.temperature.clone())
                .collect(),
            speed: record.samples.iter().map(|s| s.speed_m_per_s).collect(),
            phase: record.samples.iter().map(|s| s.phase).collect(),
            stop_time: record.stop_time_s,
            braking_distance: record.braking_distance_m,
            final_temp: record.final_state.temperature.clone(),
            x_coords: record.grid.coords(),
            parameters: TraceParameters::new(params, record),
            peak_temperature: record.peak_temp_c,
            peak_time: record.peak_time_s,
            braking_steps: record.braking_steps,
            cooling_steps: record.cooling_steps,
        }
    }

    /// Number of recorded samples.
    pub fn len(&self) -> usize {
        self.time_steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time_steps.is_empty()
    }

    pub fn final_max_temperature(&self) -> f64 {
        self.final_temp
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Reject traces written by a different layout or with ragged series.
    pub fn check(&self) -> ResultsResult<()> {
        if self.format_version != FORMAT_VERSION {
            return Err(ResultsError::UnsupportedVersion {
                found: self.format_version,
                expected: FORMAT_VERSION,
            });
        }
        let n = self.len();
        for (what, len) in [
            ("temp_data", self.temp_data.len()),
            ("speed", self.speed.len()),
            ("phase", self.phase.len()),
        ] {
            if len != n {
                return Err(ResultsError::MalformedTrace {
                    what: format!("{what} has {len} samples, time_steps has {n}"),
                });
            }
        }
        let points = self.x_coords.len();
        if self.parameters.points != points || self.final_temp.len() != points {
            return Err(ResultsError::MalformedTrace {
                what: format!("grid has {points} coordinates but N = {}", self.parameters.points),
            });
        }
        if let Some(i) = self.temp_data.iter().position(|row| row.len() != points) {
            return Err(ResultsError::MalformedTrace {
                what: format!("sample {i} has {} values, expected {points}", self.temp_data[i].len()),
            });
        }
        Ok(())
    }
}
