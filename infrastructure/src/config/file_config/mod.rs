//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod backend;
mod orchestrator;
mod output;
mod rate_limit;
mod storage;

pub use backend::FileBackendConfig;
pub use orchestrator::FileOrchestratorConfig;
pub use output::FileOutputConfig;
pub use rate_limit::FileRateLimitConfig;
pub use storage::FileStorageConfig;

use forge_application::OrchestratorConfig;
use forge_domain::ScoringWeights;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// A configuration value that cannot work
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("orchestrator.max_retries must be at least 1")]
    NoAttempts,

    #[error("orchestrator.timeout_ms cannot be 0")]
    InvalidTimeout,

    #[error("orchestrator.backoff_cap_ms ({cap}) is below backoff_base_ms ({base})")]
    BackoffCapBelowBase { base: u64, cap: u64 },

    #[error("rate_limit.window_ms cannot be 0")]
    EmptyWindow,

    #[error("backend.min_latency_ms ({min}) exceeds max_latency_ms ({max})")]
    LatencyRange { min: u64, max: u64 },

    #[error("scoring.{field} must be between 0 and 100, got {value}")]
    ScoringOutOfRange { field: &'static str, value: String },

    #[error("backend.model cannot be empty")]
    EmptyModelName,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Retry and timeout settings
    pub orchestrator: FileOrchestratorConfig,
    /// Sliding-window quota
    pub rate_limit: FileRateLimitConfig,
    /// Quality/confidence heuristics (uses domain type)
    pub scoring: ScoringWeights,
    /// Simulated backend settings
    pub backend: FileBackendConfig,
    /// Durable state locations
    pub storage: FileStorageConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning every detected issue.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();

        let orchestrator = &self.orchestrator;
        if orchestrator.max_retries == 0 {
            issues.push(ConfigValidationError::NoAttempts);
        }
        if orchestrator.timeout_ms == 0 {
            issues.push(ConfigValidationError::InvalidTimeout);
        }
        if orchestrator.backoff_cap_ms < orchestrator.backoff_base_ms {
            issues.push(ConfigValidationError::BackoffCapBelowBase {
                base: orchestrator.backoff_base_ms,
                cap: orchestrator.backoff_cap_ms,
            });
        }

        if self.rate_limit.window_ms == 0 {
            issues.push(ConfigValidationError::EmptyWindow);
        }

        if self.backend.min_latency_ms > self.backend.max_latency_ms {
            issues.push(ConfigValidationError::LatencyRange {
                min: self.backend.min_latency_ms,
                max: self.backend.max_latency_ms,
            });
        }
        if self.backend.model.trim().is_empty() {
            issues.push(ConfigValidationError::EmptyModelName);
        }

        let scoring = &self.scoring;
        for (field, value) in [
            ("baseline", scoring.baseline),
            ("completeness_weight", scoring.completeness_weight),
            ("length_bonus", scoring.length_bonus),
            ("encoding_bonus", scoring.encoding_bonus),
            ("token_accounting_bonus", scoring.token_accounting_bonus),
            ("high_completeness_bonus", scoring.high_completeness_bonus),
        ] {
            if !(0.0..=100.0).contains(&value) {
                issues.push(ConfigValidationError::ScoringOutOfRange {
                    field,
                    value: value.to_string(),
                });
            }
        }
        if scoring.high_completeness_threshold > 100 {
            issues.push(ConfigValidationError::ScoringOutOfRange {
                field: "high_completeness_threshold",
                value: scoring.high_completeness_threshold.to_string(),
            });
        }

        issues
    }

    /// Application-level orchestrator parameters from this file config.
    pub fn to_orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig::default()
            .with_max_retries(self.orchestrator.max_retries)
            .with_request_timeout(Duration::from_millis(self.orchestrator.timeout_ms))
            .with_backoff(
                self.orchestrator.backoff_base_ms,
                self.orchestrator.backoff_cap_ms,
            )
            .with_rate_limit(self.rate_limit.window_ms, self.rate_limit.max_requests)
            .with_scoring(self.scoring.clone())
    }
}
