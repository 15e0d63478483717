//! Run execution and caching service.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use bh_results::{BrakeTrace, RunConfig, RunManifest, RunStore, TraceStore, compute_run_id};
use bh_sim::{SchemeType, SimProgress, ThermalParameters, run_sim, run_sim_with_progress};

use crate::error::{AppError, AppResult};
use crate::progress::{RunProgressEvent, RunStage, SimulationProgress};

/// Options for running simulations.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub use_cache: bool,
    pub solver_version: String,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            solver_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Request to execute a run.
pub struct RunRequest<'a> {
    pub params: &'a ThermalParameters,
    pub config: RunConfig,
    /// Run cache directory; `None` runs without touching the cache.
    pub store_dir: Option<&'a Path>,
    pub options: RunOptions,
}

/// Response from a run execution.
#[derive(Debug, Clone)]
pub struct RunResponse {
    pub run_id: String,
    pub manifest: RunManifest,
    pub trace: BrakeTrace,
    pub loaded_from_cache: bool,
    pub elapsed_wall_s: f64,
}

fn emit_progress(
    progress_cb: &mut Option<&mut dyn FnMut(RunProgressEvent)>,
    scheme: SchemeType,
    stage: RunStage,
    started: Instant,
    message: &str,
) {
    if let Some(cb) = progress_cb.as_deref_mut() {
        cb(RunProgressEvent::stage(
            scheme,
            stage,
            started.elapsed().as_secs_f64(),
            Some(message.to_string()),
        ));
    }
}

/// Execute or load a run based on request.
pub fn ensure_run(request: &RunRequest) -> AppResult<RunResponse> {
    ensure_run_with_progress(request, None)
}

/// Execute or load a run and stream progress events.
pub fn ensure_run_with_progress(
    request: &RunRequest,
    mut progress_cb: Option<&mut dyn FnMut(RunProgressEvent)>,
) -> AppResult<RunResponse> {
    let started = Instant::now();
    let scheme = request.config.scheme;
    let run_id = compute_run_id(
        request.params,
        &request.config,
        &request.options.solver_version,
    );
    let store = request
        .store_dir
        .map(|dir| RunStore::new(dir.to_path_buf()))
        .transpose()?;

    if let Some(store) = &store
        && request.options.use_cache
    {
        emit_progress(
            &mut progress_cb,
            scheme,
            RunStage::CheckingCache,
            started,
            "Checking run cache",
        );
        if store.has_run(&run_id) {
            emit_progress(
                &mut progress_cb,
                scheme,
                RunStage::LoadingCachedResult,
                started,
                "Loading cached run",
            );
            let manifest = store.load_manifest(&run_id)?;
            let trace = store.load_trace(&run_id)?;
            tracing::info!(%run_id, scheme = scheme.name(), "loaded cached run");
            emit_progress(
                &mut progress_cb,
                scheme,
                RunStage::Completed,
                started,
                "Loaded cached run",
            );
            return Ok(RunResponse {
                run_id,
                manifest,
                trace,
                loaded_from_cache: true,
                elapsed_wall_s: started.elapsed().as_secs_f64(),
            });
        }
    }

    emit_progress(
        &mut progress_cb,
        scheme,
        RunStage::Simulating,
        started,
        "Running brake simulation",
    );
    let opts = request.config.to_options();
    let record = match progress_cb.as_deref_mut() {
        Some(cb) => {
            let mut forward = |p: &SimProgress| {
                cb(RunProgressEvent {
                    scheme,
                    stage: RunStage::Simulating,
                    elapsed_wall_s: started.elapsed().as_secs_f64(),
                    message: None,
                    simulation: Some(SimulationProgress::from(p)),
                });
            };
            run_sim_with_progress(request.params, &opts, &mut forward)?
        }
        None => run_sim(request.params, &opts)?,
    };
    let trace = BrakeTrace::from_record(&record, request.params);
    let manifest = RunManifest::new(
        run_id.clone(),
        request.config.clone(),
        &request.options.solver_version,
    );

    if let Some(store) = &store {
        emit_progress(
            &mut progress_cb,
            scheme,
            RunStage::SavingResults,
            started,
            "Saving run",
        );
        store.save_run(&manifest, &trace)?;
    }

    emit_progress(
        &mut progress_cb,
        scheme,
        RunStage::Completed,
        started,
        "Run completed",
    );

    Ok(RunResponse {
        run_id,
        manifest,
        trace,
        loaded_from_cache: false,
        elapsed_wall_s: started.elapsed().as_secs_f64(),
    })
}

/// Read a YAML parameter file. Missing keys keep their defaults.
pub fn load_params(path: &Path) -> AppResult<ThermalParameters> {
    let content = fs::read_to_string(path).map_err(|source| AppError::ParamsFileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let params: ThermalParameters =
        serde_yaml::from_str(&content).map_err(|e| AppError::ParamsParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    params.validate()?;
    Ok(params)
}

/// Write a trace file, creating parent directories as needed.
pub fn write_trace(path: &Path, trace: &BrakeTrace) -> AppResult<PathBuf> {
    let store = TraceStore::new(path);
    store.save(trace)?;
    Ok(store.path().to_path_buf())
}

pub fn load_trace(path: &Path) -> AppResult<BrakeTrace> {
    if !path.exists() {
        return Err(AppError::InvalidInput(format!(
            "trace file {} does not exist",
            path.display()
        )));
    }
    Ok(TraceStore::new(path).load()?)
}

/// Cached runs, most recent first.
pub fn list_runs(store_dir: &Path) -> AppResult<Vec<RunManifest>> {
    let store = RunStore::new(store_dir.to_path_buf())?;
    Ok(store.list_runs()?)
}

/// Load a specific cached run.
pub fn load_run(store_dir: &Path, run_id: &str) -> AppResult<(RunManifest, BrakeTrace)> {
    let store = RunStore::new(store_dir.to_path_buf())?;

    let manifest = store.load_manifest(run_id)?;
    let trace = store.load_trace(run_id)?;

    Ok((manifest, trace))
}
