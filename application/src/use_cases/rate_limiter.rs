//! Store-backed sliding-window rate limiter.
//!
//! Wraps [`SlidingWindow`] around a [`CounterStore`]: each acquisition reads
//! the key's timestamp log, decides, and writes it back inside one
//! [`CounterStore::update`] call under the limiter's own lock.

use crate::ports::clock::Clock;
use crate::ports::counter_store::CounterStore;
use crate::use_cases::failure::GenerationFailure;
use crate::use_cases::shared::lock;
use forge_domain::{RateLimitDecision, RateLimitSnapshot, ServiceType, SlidingWindow, rate_limit_key};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Proof that a request was admitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitPermit {
    pub key: String,
    pub snapshot: RateLimitSnapshot,
}

pub struct RateLimiter {
    store: Arc<dyn CounterStore>,
    clock: Arc<dyn Clock>,
    window: SlidingWindow,
    /// Serializes read-modify-write cycles on the store
    guard: Mutex<()>,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn CounterStore>, clock: Arc<dyn Clock>, window: SlidingWindow) -> Self {
        Self {
            store,
            clock,
            window,
            guard: Mutex::new(()),
        }
    }

    pub fn window(&self) -> SlidingWindow {
        self.window
    }

    /// Admit one request for `subject_id`/`service_type`, or deny with a
    /// retryable [`GenerationFailure::RateLimited`].
    pub fn try_acquire(
        &self,
        subject_id: &str,
        service_type: ServiceType,
    ) -> Result<RateLimitPermit, GenerationFailure> {
        let key = rate_limit_key(subject_id, service_type);

        let mut decision = None;
        {
            let _guard = lock(&self.guard);
            let now = self.clock.now_millis();
            self.store.update(&key, &mut |timestamps: &mut Vec<u64>| {
                decision = Some(self.window.try_acquire(timestamps, now));
            });
        }

        match decision {
            None => Err(GenerationFailure::Unexpected(format!(
                "counter store skipped the update of {}",
                key
            ))),
            Some(RateLimitDecision::Allowed(snapshot)) => {
                debug!(
                    key = %key,
                    count = snapshot.request_count,
                    limit = snapshot.limit,
                    "Rate limit permit granted"
                );
                Ok(RateLimitPermit { key, snapshot })
            }
            Some(RateLimitDecision::Denied(snapshot)) => {
                warn!(
                    key = %key,
                    count = snapshot.request_count,
                    limit = snapshot.limit,
                    "Rate limit exceeded"
                );
                Err(GenerationFailure::RateLimited(snapshot))
            }
        }
    }
}
