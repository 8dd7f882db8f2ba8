//! Observable state of an orchestrator run.

pub mod state;

pub use state::{OrchestratorRunState, RunStatus, progress};
