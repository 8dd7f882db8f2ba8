//! Storage configuration from TOML (`[storage]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    /// JSON file backing the rate-limit counters; in-memory when unset
    pub counter_store: Option<PathBuf>,
    /// JSONL run event log; disabled when unset
    pub run_log: Option<PathBuf>,
}
