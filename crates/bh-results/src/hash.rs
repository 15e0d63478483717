//! Content-based hashing for run IDs.

use bh_sim::ThermalParameters;
use sha2::{Digest, Sha256};

use crate::types::RunConfig;

pub fn compute_run_id(
    params: &ThermalParameters,
    config: &RunConfig,
    solver_version: &str,
) -> String {
    let mut hasher = Sha256::new();

    let params_json = serde_json::to_string(params).unwrap_or_default();
    hasher.update(params_json.as_bytes());

    let config_json = serde_json::to_string(config).unwrap_or_default();
    hasher.update(config_json.as_bytes());

    hasher.update(solver_version.as_bytes());

    let result = hasher.finalize();
    format!("{:x}", result)
}
