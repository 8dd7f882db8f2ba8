//! Run state entities

use crate::classification::ClassifiedError;
use crate::generation::GenerationResult;
use serde::{Deserialize, Serialize};

/// Status of an orchestrator run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunStatus {
    #[default]
    Idle,
    Validating,
    ContextBuilding,
    Invoking,
    Retrying,
    Success,
    Error,
    Cancelled,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Idle => "idle",
            RunStatus::Validating => "validating",
            RunStatus::ContextBuilding => "context-building",
            RunStatus::Invoking => "invoking",
            RunStatus::Retrying => "retrying",
            RunStatus::Success => "success",
            RunStatus::Error => "error",
            RunStatus::Cancelled => "cancelled",
        }
    }

    /// Terminal states accept no further updates for the same run.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunStatus::Success | RunStatus::Error | RunStatus::Cancelled
        )
    }

    pub fn is_in_flight(&self) -> bool {
        !self.is_terminal() && *self != RunStatus::Idle
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Progress checkpoints. Each phase owns a band so the values only grow
/// within a run.
pub mod progress {
    pub const STARTED: u8 = 0;
    pub const VALIDATED: u8 = 10;
    pub const RATE_LIMIT_CHECKED: u8 = 15;
    pub const CONTEXT_STARTED: u8 = 20;
    pub const CONTEXT_BUILT: u8 = 40;
    pub const INVOKE_STARTED: u8 = 50;
    pub const INVOKE_FINISHED: u8 = 90;
    pub const COMPLETE: u8 = 100;
}

/// Snapshot of a single run, as seen by observers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OrchestratorRunState {
    /// Monotonic run identifier; 0 means no run has started
    pub run_id: u64,
    pub status: RunStatus,
    pub progress: u8,
    pub current_step: String,
    pub retry_count: u32,
    pub max_retries: u32,
    pub result: Option<GenerationResult>,
    pub error: Option<ClassifiedError>,
}

impl OrchestratorRunState {
    pub fn idle() -> Self {
        Self {
            current_step: "Idle".to_string(),
            ..Default::default()
        }
    }

    /// Fresh state for a newly started run.
    pub fn started(run_id: u64, max_retries: u32) -> Self {
        Self {
            run_id,
            status: RunStatus::Validating,
            progress: progress::STARTED,
            current_step: "Validating request".to_string(),
            retry_count: 0,
            max_retries,
            result: None,
            error: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Move to `status` and raise progress to at least `progress`.
    /// Progress never decreases.
    pub fn advance(&mut self, status: RunStatus, progress: u8, step: impl Into<String>) {
        self.status = status;
        self.progress = self.progress.max(progress.min(progress::COMPLETE));
        self.current_step = step.into();
    }

    pub fn succeed(&mut self, result: GenerationResult) {
        self.advance(RunStatus::Success, progress::COMPLETE, "Complete");
        self.result = Some(result);
        self.error = None;
    }

    pub fn fail(&mut self, error: ClassifiedError) {
        self.status = RunStatus::Error;
        self.current_step = "Failed".to_string();
        self.result = None;
        self.error = Some(error);
    }

    pub fn cancel(&mut self) {
        self.status = RunStatus::Cancelled;
        self.current_step = "Cancelled".to_string();
    }
}
