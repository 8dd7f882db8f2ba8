//! Orchestrator configuration from TOML (`[orchestrator]` section)

use serde::{Deserialize, Serialize};

/// Raw retry and timeout settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOrchestratorConfig {
    /// Attempts per run, first attempt included
    pub max_retries: u32,
    /// Timeout for one backend call, in milliseconds
    pub timeout_ms: u64,
    pub backoff_base_ms: u64,
    pub backoff_cap_ms: u64,
}

impl Default for FileOrchestratorConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            timeout_ms: 30_000,
            backoff_base_ms: 1_000,
            backoff_cap_ms: 5_000,
        }
    }
}
