//! Error classification: map pipeline failures onto the closed taxonomy.

use crate::ports::clock::Clock;
use crate::ports::generation_backend::BackendErrorKind;
use crate::use_cases::failure::GenerationFailure;
use forge_domain::{ClassifiedError, ErrorDiagnostics, ErrorKind, ServiceType};
use std::sync::Arc;

pub struct ErrorClassifier {
    clock: Arc<dyn Clock>,
}

impl ErrorClassifier {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Taxonomy kind for a failure.
    pub fn kind_of(failure: &GenerationFailure) -> ErrorKind {
        match failure {
            GenerationFailure::Validation(report) if report.is_encoding_only() => {
                ErrorKind::Utf8EncodingError
            }
            GenerationFailure::Validation(_) => ErrorKind::ValidationFailed,
            GenerationFailure::RateLimited(_) => ErrorKind::RateLimitExceeded,
            GenerationFailure::ContextBuild(_) => ErrorKind::ContextBuildFailed,
            GenerationFailure::Backend(err) => match err.kind {
                BackendErrorKind::Encoding => ErrorKind::Utf8EncodingError,
                BackendErrorKind::Quota => ErrorKind::RateLimitExceeded,
                BackendErrorKind::Network
                | BackendErrorKind::Rejected
                | BackendErrorKind::Internal => ErrorKind::BackendError,
            },
            GenerationFailure::Timeout(_) | GenerationFailure::DeadlineExceeded { .. } => {
                ErrorKind::TimeoutError
            }
            GenerationFailure::MaxRetriesExceeded { .. } => ErrorKind::MaxRetriesExceeded,
            GenerationFailure::Cancelled | GenerationFailure::Unexpected(_) => {
                ErrorKind::UnknownError
            }
        }
    }

    /// Build the [`ClassifiedError`] for `failure`.
    ///
    /// The user-facing message and accessibility data come from the kind
    /// alone; the raw failure text goes into `message` and diagnostics.
    pub fn classify(
        &self,
        failure: &GenerationFailure,
        service_type: ServiceType,
        correlation_id: &str,
    ) -> ClassifiedError {
        let kind = Self::kind_of(failure);

        ClassifiedError::new(
            kind,
            failure.to_string(),
            service_type,
            self.clock.now_millis(),
            correlation_id,
        )
        .with_retryable(failure.is_retryable())
        .with_diagnostics(diagnostics(failure))
    }
}

fn diagnostics(failure: &GenerationFailure) -> ErrorDiagnostics {
    let mut diagnostics = ErrorDiagnostics::default();
    match failure {
        GenerationFailure::Validation(report) => {
            diagnostics.problems = report.messages();
        }
        GenerationFailure::RateLimited(snapshot) => {
            diagnostics.rate_limit = Some(*snapshot);
        }
        GenerationFailure::MaxRetriesExceeded { retry_count, last } => {
            diagnostics.retry_count = Some(*retry_count);
            diagnostics.cause = Some(last.to_string());
            if let GenerationFailure::RateLimited(snapshot) = last.as_ref() {
                diagnostics.rate_limit = Some(*snapshot);
            }
        }
        GenerationFailure::ContextBuild(err) => diagnostics.cause = Some(err.to_string()),
        GenerationFailure::Backend(err) => diagnostics.cause = Some(err.to_string()),
        GenerationFailure::Timeout(_)
        | GenerationFailure::DeadlineExceeded { .. }
        | GenerationFailure::Cancelled
        | GenerationFailure::Unexpected(_) => diagnostics.cause = Some(failure.to_string()),
    }
    diagnostics
}
