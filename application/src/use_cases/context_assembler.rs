//! Context assembly: fetch a subject's context for one run.

use crate::ports::subject_data::SubjectDataProvider;
use crate::use_cases::failure::GenerationFailure;
use crate::use_cases::shared::cancellable;
use forge_domain::SubjectContext;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Builds a fresh [`SubjectContext`] per run. No caching, no retries.
pub struct ContextAssembler {
    provider: Arc<dyn SubjectDataProvider>,
}

impl ContextAssembler {
    pub fn new(provider: Arc<dyn SubjectDataProvider>) -> Self {
        Self { provider }
    }

    pub async fn build(
        &self,
        subject_id: &str,
        token: &CancellationToken,
    ) -> Result<SubjectContext, GenerationFailure> {
        let context = cancellable(token, async {
            self.provider
                .fetch(subject_id)
                .await
                .map_err(GenerationFailure::ContextBuild)
        })
        .await;

        match &context {
            Ok(context) => debug!(
                subject_id,
                completeness = context.completeness(),
                "Subject context assembled"
            ),
            Err(GenerationFailure::Cancelled) => {}
            Err(e) => warn!(subject_id, error = %e, "Subject context unavailable"),
        }

        context
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::subject_data::ProviderError;
    use crate::use_cases::testing::StaticProvider;

    #[tokio::test]
    async fn test_build_returns_provider_context() {
        let provider = Arc::new(StaticProvider::new(crate::use_cases::testing::sample_context()));
        let assembler = ContextAssembler::new(provider.clone());

        let context = assembler
            .build("s-1", &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(context.completeness(), 100);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_provider_failure_is_retryable_context_error() {
        let provider = Arc::new(StaticProvider::failing(ProviderError::Unavailable(
            "directory offline".to_string(),
        )));
        let assembler = ContextAssembler::new(provider);

        let err = assembler
            .build("s-1", &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationFailure::ContextBuild(_)));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_cancelled_token_skips_provider() {
        let provider = Arc::new(StaticProvider::new(SubjectContext::default()));
        let assembler = ContextAssembler::new(provider.clone());
        let token = CancellationToken::new();
        token.cancel();

        let err = assembler.build("s-1", &token).await.unwrap_err();
        assert!(err.is_cancelled());
        assert_eq!(provider.calls(), 0);
    }
}
