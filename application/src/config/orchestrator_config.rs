//! Orchestrator parameters: retry, timeout, rate-limit and scoring control.
//!
//! [`OrchestratorConfig`] groups the static parameters that control a
//! [`Orchestrator`](crate::use_cases::orchestrator::Orchestrator) run.

use forge_domain::{ScoringWeights, SlidingWindow};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Run control parameters.
///
/// | Parameter                 | Default |
/// |---------------------------|---------|
/// | `max_retries`             | 3       |
/// | `request_timeout`         | 30 s    |
/// | `rate_limit_window_ms`    | 60000   |
/// | `max_requests_per_window` | 100     |
/// | `backoff_base_ms`         | 1000    |
/// | `backoff_cap_ms`          | 5000    |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Maximum attempts per run (the first attempt counts).
    pub max_retries: u32,
    /// Timeout for a single backend call.
    pub request_timeout: Duration,
    /// Width of the sliding rate-limit window.
    pub rate_limit_window_ms: u64,
    /// Accepted requests allowed inside any one window.
    pub max_requests_per_window: u32,
    /// Delay before the first retry; doubles per attempt.
    pub backoff_base_ms: u64,
    /// Upper bound on any single retry delay.
    pub backoff_cap_ms: u64,
    pub scoring: ScoringWeights,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            request_timeout: Duration::from_secs(30),
            rate_limit_window_ms: 60_000,
            max_requests_per_window: 100,
            backoff_base_ms: 1_000,
            backoff_cap_ms: 5_000,
            scoring: ScoringWeights::default(),
        }
    }
}

impl OrchestratorConfig {
    // ==================== Builder Methods ====================

    pub fn with_max_retries(mut self, max: u32) -> Self {
        self.max_retries = max;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_rate_limit(mut self, window_ms: u64, max_per_window: u32) -> Self {
        self.rate_limit_window_ms = window_ms;
        self.max_requests_per_window = max_per_window;
        self
    }

    pub fn with_backoff(mut self, base_ms: u64, cap_ms: u64) -> Self {
        self.backoff_base_ms = base_ms;
        self.backoff_cap_ms = cap_ms;
        self
    }

    pub fn with_scoring(mut self, scoring: ScoringWeights) -> Self {
        self.scoring = scoring;
        self
    }

    // ==================== Derived Values ====================

    /// Attempts actually made; at least one.
    pub fn attempts(&self) -> u32 {
        self.max_retries.max(1)
    }

    /// Delay before retrying after the failed attempt with 0-based index
    /// `attempt`: `min(base * 2^attempt, cap)`.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
        let delay = self.backoff_base_ms.saturating_mul(factor);
        Duration::from_millis(delay.min(self.backoff_cap_ms))
    }

    pub fn sliding_window(&self) -> SlidingWindow {
        SlidingWindow::new(self.rate_limit_window_ms, self.max_requests_per_window)
    }
}
