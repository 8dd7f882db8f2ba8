//! Run state listener port
//!
//! Observers of [`OrchestratorRunState`] changes. Implementations live in
//! the presentation layer (progress bars, status lines).

use forge_domain::OrchestratorRunState;

/// Called after every published state transition
///
/// Invoked synchronously from the orchestrator; implementations must not
/// block.
pub trait RunStateListener: Send + Sync {
    fn on_state_change(&self, state: &OrchestratorRunState);
}

/// No-op listener for when state reporting is not needed
pub struct NoStateListener;

impl RunStateListener for NoStateListener {
    fn on_state_change(&self, _state: &OrchestratorRunState) {}
}
