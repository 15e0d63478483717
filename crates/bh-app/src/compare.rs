//! Side-by-side runs of both time schemes on the same pad.

use std::path::Path;

use bh_core::numeric::max_abs_diff;
use bh_results::RunConfig;
use bh_sim::{SchemeType, ThermalParameters};
use rayon::prelude::*;

use crate::error::{AppError, AppResult};
use crate::run_service::{RunOptions, RunRequest, RunResponse, ensure_run};

/// Both schemes run on identical inputs.
#[derive(Debug, Clone)]
pub struct SchemeComparison {
    pub implicit: RunResponse,
    pub two_pass: RunResponse,
    /// Largest pointwise difference over all shared samples (K)
    pub max_field_diff: f64,
    /// Largest pointwise difference between the final fields (K)
    pub final_field_diff: f64,
}

/// Run every scheme in parallel and measure how far the fields drift apart.
pub fn compare_schemes(
    params: &ThermalParameters,
    cooling_time_s: f64,
    sample_interval_s: f64,
    store_dir: Option<&Path>,
    options: &RunOptions,
) -> AppResult<SchemeComparison> {
    let mut responses = SchemeType::ALL
        .par_iter()
        .map(|&scheme| {
            let request = RunRequest {
                params,
                config: RunConfig {
                    scheme,
                    cooling_time_s,
                    sample_interval_s,
                },
                store_dir,
                options: options.clone(),
            };
            ensure_run(&request)
        })
        .collect::<AppResult<Vec<_>>>()?
        .into_iter();

    let (Some(implicit), Some(two_pass)) = (responses.next(), responses.next()) else {
        return Err(AppError::InvalidInput(
            "scheme comparison produced fewer than two runs".to_string(),
        ));
    };

    let a = &implicit.trace;
    let b = &two_pass.trace;
    if a.len() != b.len() {
        return Err(AppError::InvalidInput(format!(
            "sample counts differ: {} vs {}",
            a.len(),
            b.len()
        )));
    }
    let mut max_field_diff: f64 = 0.0;
    for (row_a, row_b) in a.temp_data.iter().zip(&b.temp_data) {
        max_field_diff = max_field_diff.max(max_abs_diff(row_a, row_b)?);
    }
    let final_field_diff = max_abs_diff(&a.final_temp, &b.final_temp)?;

    tracing::info!(max_field_diff, final_field_diff, "schemes compared");

    Ok(SchemeComparison {
        implicit,
        two_pass,
        max_field_diff,
        final_field_diff,
    })
}
