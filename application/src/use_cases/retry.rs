//! Retry controller: bounded attempts with capped exponential backoff.

use crate::config::OrchestratorConfig;
use crate::use_cases::failure::GenerationFailure;
use crate::use_cases::shared::check_cancelled;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Observer of retry progress
///
/// Both callbacks run synchronously between attempts and must not block.
pub trait RetryObserver: Send + Sync {
    /// Called before each attempt with its zero-based index.
    fn on_attempt(&self, attempt: u32, max_attempts: u32);

    /// Called after a retryable failure, before sleeping `delay`.
    fn on_attempt_failed(&self, _attempt: u32, _error: &GenerationFailure, _delay: Duration) {}
}

/// No-op observer
pub struct NoRetryObserver;

impl RetryObserver for NoRetryObserver {
    fn on_attempt(&self, _attempt: u32, _max_attempts: u32) {}
}

#[derive(Debug, Clone)]
pub struct RetryController {
    max_attempts: u32,
    config: OrchestratorConfig,
}

impl RetryController {
    pub fn new(config: &OrchestratorConfig) -> Self {
        Self {
            max_attempts: config.attempts(),
            config: config.clone(),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Run `operation` until it succeeds, fails with a non-retryable error,
    /// or runs out of attempts.
    ///
    /// Exhaustion is reported as [`GenerationFailure::MaxRetriesExceeded`]
    /// with `retry_count == max_attempts` and the last failure as its cause.
    /// Backoff sleeps observe `token`.
    pub async fn execute<T, F, Fut>(
        &self,
        mut operation: F,
        observer: &dyn RetryObserver,
        token: &CancellationToken,
    ) -> Result<T, GenerationFailure>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, GenerationFailure>>,
    {
        let mut attempt = 0;
        loop {
            check_cancelled(token)?;
            observer.on_attempt(attempt, self.max_attempts);

            let error = match operation(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_cancelled() => return Err(e),
                Err(e) if !e.is_retryable() => {
                    debug!(attempt, error = %e, "Non-retryable failure, giving up");
                    return Err(e);
                }
                Err(e) => e,
            };

            if attempt + 1 >= self.max_attempts {
                warn!(
                    attempts = self.max_attempts,
                    error = %error,
                    "Retry budget exhausted"
                );
                return Err(GenerationFailure::MaxRetriesExceeded {
                    retry_count: self.max_attempts,
                    last: Box::new(error),
                });
            }

            let delay = self.config.backoff_delay(attempt);
            warn!(
                attempt = attempt + 1,
                max_attempts = self.max_attempts,
                delay_ms = delay.as_millis() as u64,
                error = %error,
                "Generation attempt failed, retrying"
            );
            observer.on_attempt_failed(attempt, &error, delay);

            tokio::select! {
                biased;
                _ = token.cancelled() => return Err(GenerationFailure::Cancelled),
                _ = tokio::time::sleep(delay) => {}
            }
            attempt += 1;
        }
    }
}
