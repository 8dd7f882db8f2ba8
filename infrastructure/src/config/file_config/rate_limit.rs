//! Rate limit configuration from TOML (`[rate_limit]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRateLimitConfig {
    /// Sliding window width in milliseconds
    pub window_ms: u64,
    /// Accepted requests per subject and service inside one window
    pub max_requests: u32,
}

impl Default for FileRateLimitConfig {
    fn default() -> Self {
        Self {
            window_ms: 60_000,
            max_requests: 100,
        }
    }
}
