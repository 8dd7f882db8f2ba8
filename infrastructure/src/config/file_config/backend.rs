//! Backend configuration from TOML (`[backend]` section)

use serde::{Deserialize, Serialize};

/// Settings for the simulated generation backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBackendConfig {
    /// Model id reported in result metadata
    pub model: String,
    /// Simulated latency bounds in milliseconds
    pub min_latency_ms: u64,
    pub max_latency_ms: u64,
}

impl Default for FileBackendConfig {
    fn default() -> Self {
        Self {
            model: "lesson-forge-mock-1".to_string(),
            min_latency_ms: 2_000,
            max_latency_ms: 5_000,
        }
    }
}
