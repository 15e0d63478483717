//! Query helpers for extracting plot-ready series from a loaded trace.

use bh_core::numeric::max_value;
use bh_results::BrakeTrace;
use bh_sim::Phase;

use crate::error::{AppError, AppResult};

/// Summary of a trace's time range and headline figures.
#[derive(Debug, Clone)]
pub struct TraceSummary {
    pub method: String,
    pub time_range: (f64, f64),
    pub sample_count: usize,
    pub point_count: usize,
    pub braking_samples: usize,
    pub stop_time_s: f64,
    pub braking_distance_m: f64,
    pub peak_temp_c: f64,
    pub peak_time_s: f64,
    pub final_max_temp_c: f64,
}

pub fn get_trace_summary(trace: &BrakeTrace) -> AppResult<TraceSummary> {
    if trace.is_empty() {
        return Err(AppError::InvalidInput("No samples in trace".to_string()));
    }

    let t_min = trace.time_steps.first().copied().unwrap_or(0.0);
    let t_max = trace.time_steps.last().copied().unwrap_or(0.0);

    Ok(TraceSummary {
        method: trace.method.clone(),
        time_range: (t_min, t_max),
        sample_count: trace.len(),
        point_count: trace.x_coords.len(),
        braking_samples: trace
            .phase
            .iter()
            .filter(|p| **p == Phase::Braking)
            .count(),
        stop_time_s: trace.stop_time,
        braking_distance_m: trace.braking_distance,
        peak_temp_c: trace.peak_temperature,
        peak_time_s: trace.peak_time,
        final_max_temp_c: trace.final_max_temperature(),
    })
}

/// `(time, hottest point)` for every sample.
pub fn max_temperature_series(trace: &BrakeTrace) -> Vec<(f64, f64)> {
    trace
        .time_steps
        .iter()
        .zip(&trace.temp_data)
        .map(|(&t, row)| (t, max_value(row)))
        .collect()
}

/// `(time, braking-surface temperature)` for every sample.
pub fn surface_temperature_series(trace: &BrakeTrace) -> Vec<(f64, f64)> {
    trace
        .time_steps
        .iter()
        .zip(&trace.temp_data)
        .filter_map(|(&t, row)| row.first().map(|&v| (t, v)))
        .collect()
}

/// Index of the sample closest to `time_s`; ties go to the earlier sample.
pub fn nearest_sample(trace: &BrakeTrace, time_s: f64) -> Option<usize> {
    let times = &trace.time_steps;
    if times.is_empty() || !time_s.is_finite() {
        return None;
    }
    let after = times.partition_point(|&t| t < time_s);
    if after == 0 {
        return Some(0);
    }
    if after == times.len() {
        return Some(times.len() - 1);
    }
    let before = after - 1;
    if time_s - times[before] <= times[after] - time_s {
        Some(before)
    } else {
        Some(after)
    }
}

/// Temperature profile across the pad at the sample nearest `time_s`.
pub fn profile_at(trace: &BrakeTrace, time_s: f64) -> AppResult<(f64, &[f64])> {
    let i = nearest_sample(trace, time_s)
        .ok_or_else(|| AppError::InvalidInput(format!("no sample near t = {time_s} s")))?;
    Ok((trace.time_steps[i], trace.temp_data[i].as_slice()))
}
