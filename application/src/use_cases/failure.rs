//! Failure type shared by the generation pipeline.

use crate::ports::generation_backend::{BackendError, BackendErrorKind};
use crate::ports::subject_data::ProviderError;
use forge_domain::{RateLimitSnapshot, ValidationReport};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while running a generation
///
/// Never leaves the orchestrator: it is classified into a
/// [`ClassifiedError`](forge_domain::ClassifiedError) first.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationFailure {
    #[error("Request validation failed: {}", .0.messages().join("; "))]
    Validation(ValidationReport),

    #[error(
        "Rate limit exceeded: {} of {} requests in the last {} ms",
        .0.request_count, .0.limit, .0.window_ms
    )]
    RateLimited(RateLimitSnapshot),

    #[error("Context build failed: {0}")]
    ContextBuild(#[from] ProviderError),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Backend call timed out after {} ms", .0.as_millis())]
    Timeout(Duration),

    #[error("Request deadline {deadline} passed at {now}")]
    DeadlineExceeded { deadline: u64, now: u64 },

    #[error("Generation failed after {retry_count} attempts: {last}")]
    MaxRetriesExceeded {
        retry_count: u32,
        last: Box<GenerationFailure>,
    },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl GenerationFailure {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, GenerationFailure::Cancelled)
    }

    /// Whether another attempt within the same run could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            GenerationFailure::Validation(_)
            | GenerationFailure::DeadlineExceeded { .. }
            | GenerationFailure::MaxRetriesExceeded { .. }
            | GenerationFailure::Cancelled => false,
            GenerationFailure::Backend(err) => {
                !err.permanent && err.kind != BackendErrorKind::Encoding
            }
            GenerationFailure::RateLimited(_)
            | GenerationFailure::ContextBuild(_)
            | GenerationFailure::Timeout(_)
            | GenerationFailure::Unexpected(_) => true,
        }
    }
}
