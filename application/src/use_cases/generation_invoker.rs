//! Generation invoker: one timed, cancellable backend call.

use crate::ports::clock::Clock;
use crate::ports::generation_backend::GenerationBackend;
use crate::use_cases::failure::GenerationFailure;
use crate::use_cases::shared::check_cancelled;
use forge_domain::core::ids::unique_id;
use forge_domain::core::string::is_clean_text;
use forge_domain::generation::METADATA_SCHEMA_VERSION;
use forge_domain::{
    GenerationMetadata, GenerationRequest, GenerationResult, SubjectContext, UserPreferences,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub struct GenerationInvoker {
    backend: Arc<dyn GenerationBackend>,
    clock: Arc<dyn Clock>,
    timeout: Duration,
}

impl GenerationInvoker {
    pub fn new(backend: Arc<dyn GenerationBackend>, clock: Arc<dyn Clock>, timeout: Duration) -> Self {
        Self {
            backend,
            clock,
            timeout,
        }
    }

    /// Call the backend once and normalize its output into a
    /// [`GenerationResult`].
    ///
    /// `attempt` is the zero-based attempt index, recorded as the result's
    /// retry count. The call is bounded by the configured timeout, further
    /// narrowed by the request deadline when one is set.
    pub async fn invoke(
        &self,
        request: &GenerationRequest,
        context: &SubjectContext,
        preferences: Option<&UserPreferences>,
        attempt: u32,
        token: &CancellationToken,
    ) -> Result<GenerationResult, GenerationFailure> {
        check_cancelled(token)?;
        let timeout = self.effective_timeout(request)?;

        let started = Instant::now();
        let call = tokio::time::timeout(
            timeout,
            self.backend.generate(request, context, preferences),
        );

        let output = tokio::select! {
            biased;
            _ = token.cancelled() => return Err(GenerationFailure::Cancelled),
            outcome = call => match outcome {
                Err(_elapsed) => return Err(GenerationFailure::Timeout(timeout)),
                Ok(Err(e)) => return Err(GenerationFailure::Backend(e)),
                Ok(Ok(output)) => output,
            },
        };
        check_cancelled(token)?;

        let processing_time_ms = started.elapsed().as_millis() as u64;
        debug!(
            attempt,
            processing_time_ms,
            model = %output.model,
            "Backend call completed"
        );

        let mut warnings = output.warnings;
        if !is_clean_text(&output.content) {
            warnings.push("Generated content contains replacement characters".to_string());
        }

        let mut context_usage = output.context_usage;
        context_usage.completeness = context.completeness();

        let mut result = GenerationResult::new(
            unique_id("gen"),
            request.service_type,
            request.subject_id.to_string_lossy(),
        );
        result.content = Some(output.content);
        result.metadata = GenerationMetadata {
            model: output.model,
            temperature: output.temperature,
            max_tokens: output.max_tokens,
            tokens: output.tokens,
            processing_time_ms,
            retry_count: attempt,
            schema_version: METADATA_SCHEMA_VERSION.to_string(),
            request_id: Some(request.request_id.to_string_lossy().into_owned()),
            service_type: Some(request.service_type),
        };
        result.context_usage = context_usage;
        result.generated_at = self.clock.now_millis();
        result.warnings = warnings;

        Ok(result)
    }

    fn effective_timeout(&self, request: &GenerationRequest) -> Result<Duration, GenerationFailure> {
        let Some(deadline) = request.deadline else {
            return Ok(self.timeout);
        };
        let now = self.clock.now_millis();
        if now >= deadline {
            return Err(GenerationFailure::DeadlineExceeded { deadline, now });
        }
        Ok(self.timeout.min(Duration::from_millis(deadline - now)))
    }
}
