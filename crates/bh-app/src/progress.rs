use bh_sim::{Phase, SchemeType, SimProgress};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStage {
    CheckingCache,
    LoadingCachedResult,
    Simulating,
    SavingResults,
    Completed,
}

impl RunStage {
    pub fn label(&self) -> &'static str {
        match self {
            RunStage::CheckingCache => "checking-cache",
            RunStage::LoadingCachedResult => "loading-cache",
            RunStage::Simulating => "simulating",
            RunStage::SavingResults => "saving",
            RunStage::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SimulationProgress {
    pub phase: Phase,
    pub step: usize,
    pub sim_time_s: f64,
    pub speed_m_per_s: f64,
    pub max_temp_c: f64,
    pub fraction_complete: f64,
}

impl From<&SimProgress> for SimulationProgress {
    fn from(p: &SimProgress) -> Self {
        Self {
            phase: p.phase,
            step: p.step,
            sim_time_s: p.time_s,
            speed_m_per_s: p.speed_m_per_s,
            max_temp_c: p.max_temp_c,
            fraction_complete: p.fraction_complete,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunProgressEvent {
    pub scheme: SchemeType,
    pub stage: RunStage,
    pub elapsed_wall_s: f64,
    pub message: Option<String>,
    pub simulation: Option<SimulationProgress>,
}

impl RunProgressEvent {
    pub fn stage(
        scheme: SchemeType,
        stage: RunStage,
        elapsed_wall_s: f64,
        message: Option<String>,
    ) -> Self {
        Self {
            scheme,
            stage,
            elapsed_wall_s,
            message,
            simulation: None,
        }
    }
}
