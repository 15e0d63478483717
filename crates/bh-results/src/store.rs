//! Trace files and the run cache.

use crate::types::{BrakeTrace, RunManifest};
use crate::{ResultsError, ResultsResult};
use std::fs;
use std::path::{Path, PathBuf};

/// A single trace file, written as pretty JSON.
#[derive(Clone, Debug)]
pub struct TraceStore {
    path: PathBuf,
}

impl TraceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self, trace: &BrakeTrace) -> ResultsResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(trace)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    /// Read and check a trace.
    pub fn load(&self) -> ResultsResult<BrakeTrace> {
        let content = fs::read_to_string(&self.path)?;
        let trace: BrakeTrace = serde_json::from_str(&content)?;
        trace.check()?;
        Ok(trace)
    }
}

/// Directory of runs keyed by run id: `<root>/<run_id>/{manifest.json, trace.json}`.
#[derive(Clone)]
pub struct RunStore {
    root_dir: PathBuf,
}

impl RunStore {
    pub fn new(root_dir: PathBuf) -> ResultsResult<Self> {
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    pub fn root(&self) -> &Path {
        &self.root_dir
    }

    fn run_dir(&self, run_id: &str) -> PathBuf {
        self.root_dir.join(run_id)
    }

    fn trace_store(&self, run_id: &str) -> TraceStore {
        TraceStore::new(self.run_dir(run_id).join("trace.json"))
    }

    pub fn has_run(&self, run_id: &str) -> bool {
        let dir = self.run_dir(run_id);
        dir.join("manifest.json").exists() && dir.join("trace.json").exists()
    }

    pub fn save_run(&self, manifest: &RunManifest, trace: &BrakeTrace) -> ResultsResult<()> {
        let run_dir = self.run_dir(&manifest.run_id);
        fs::create_dir_all(&run_dir)?;

        let manifest_json = serde_json::to_string_pretty(manifest)?;
        fs::write(run_dir.join("manifest.json"), manifest_json)?;

        self.trace_store(&manifest.run_id).save(trace)
    }

    pub fn load_manifest(&self, run_id: &str) -> ResultsResult<RunManifest> {
        let manifest_path = self.run_dir(run_id).join("manifest.json");

        if !manifest_path.exists() {
            return Err(ResultsError::RunNotFound {
                run_id: run_id.to_string(),
            });
        }

        let content = fs::read_to_string(manifest_path)?;
        let manifest = serde_json::from_str(&content)?;
        Ok(manifest)
    }

    pub fn load_trace(&self, run_id: &str) -> ResultsResult<BrakeTrace> {
        let store = self.trace_store(run_id);
        if !store.path().exists() {
            return Err(ResultsError::RunNotFound {
                run_id: run_id.to_string(),
            });
        }
        store.load()
    }

    /// Every readable manifest, most recent first.
    pub fn list_runs(&self) -> ResultsResult<Vec<RunManifest>> {
        let mut runs = Vec::new();

        if !self.root_dir.exists() {
            return Ok(runs);
        }

        for entry in fs::read_dir(&self.root_dir)? {
            let entry = entry?;
            if entry.path().is_dir() {
                let run_id = entry.file_name().to_string_lossy().to_string();
                if let Ok(manifest) = self.load_manifest(&run_id) {
                    runs.push(manifest);
                }
            }
        }

        runs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(runs)
    }

    pub fn delete_run(&self, run_id: &str) -> ResultsResult<()> {
        let run_dir = self.run_dir(run_id);
        if run_dir.exists() {
            fs::remove_dir_all(run_dir)?;
        }
        Ok(())
    }
}
