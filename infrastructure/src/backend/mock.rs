//! Simulated generation backend.
//!
//! Produces per-service documents from the subject context after a
//! simulated latency. Latency and token counts are derived from the
//! request id, so the same request always behaves the same way.

use super::templates;
use crate::config::FileBackendConfig;
use async_trait::async_trait;
use forge_application::{BackendError, BackendOutput, GenerationBackend};
use forge_domain::{
    ContextUsageInfo, GenerationRequest, SubjectContext, TokenUsage, UserPreferences,
};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;
use tracing::debug;

const DATA_SOURCES: [&str; 3] = ["student_profile", "learning_history", "support_needs"];
const INDIVIDUALIZED: [&str; 3] = ["disability_type", "learning_pace", "support_needs"];
const ADAPTATIONS: [&str; 2] = ["visual_support", "reduced_complexity"];

/// Backend that renders template documents instead of calling a model
pub struct MockGenerationBackend {
    model: String,
    min_latency: Duration,
    max_latency: Duration,
}

impl MockGenerationBackend {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            min_latency: Duration::from_millis(2_000),
            max_latency: Duration::from_millis(5_000),
        }
    }

    pub fn from_config(config: &FileBackendConfig) -> Self {
        Self::new(config.model.clone()).with_latency(
            Duration::from_millis(config.min_latency_ms),
            Duration::from_millis(config.max_latency_ms),
        )
    }

    /// Latency bounds; `max` below `min` is treated as `min`.
    pub fn with_latency(mut self, min: Duration, max: Duration) -> Self {
        self.min_latency = min;
        self.max_latency = max.max(min);
        self
    }

    fn seed(request: &GenerationRequest) -> u64 {
        let mut hasher = DefaultHasher::new();
        request.request_id.as_bytes().hash(&mut hasher);
        hasher.finish()
    }

    fn latency_for(&self, seed: u64) -> Duration {
        let spread = (self.max_latency - self.min_latency).as_millis() as u64;
        let jitter = if spread == 0 { 0 } else { seed % (spread + 1) };
        self.min_latency + Duration::from_millis(jitter)
    }

    fn context_usage(context: &SubjectContext) -> ContextUsageInfo {
        let owned = |items: &[&str]| -> Vec<String> { items.iter().map(|s| s.to_string()).collect() };
        ContextUsageInfo {
            data_sources_used: owned(&DATA_SOURCES),
            completeness: context.completeness(),
            individualized_elements: owned(&INDIVIDUALIZED),
            adaptations_applied: owned(&ADAPTATIONS),
            support_needs_addressed: context.support_needs.iter().take(3).cloned().collect(),
        }
    }

    fn personalize(content: &mut String, preferences: Option<&UserPreferences>) {
        let Some(prefs) = preferences else {
            return;
        };
        if !prefs.focus_areas.is_empty() {
            content.push_str("\n\n## 중점 영역\n");
            content.push_str(
                &prefs
                    .focus_areas
                    .iter()
                    .map(|area| format!("- {}", area))
                    .collect::<Vec<_>>()
                    .join("\n"),
            );
        }
        if !prefs.custom_instructions.trim().is_empty() {
            content.push_str("\n\n> ");
            content.push_str(prefs.custom_instructions.trim());
        }
    }
}

#[async_trait]
impl GenerationBackend for MockGenerationBackend {
    async fn generate(
        &self,
        request: &GenerationRequest,
        context: &SubjectContext,
        preferences: Option<&UserPreferences>,
    ) -> Result<BackendOutput, BackendError> {
        let seed = Self::seed(request);
        let latency = self.latency_for(seed);
        debug!(
            "Mock backend generating {} ({}ms)",
            request.service_type,
            latency.as_millis()
        );
        tokio::time::sleep(latency).await;

        let today = chrono::Local::now().format("%Y-%m-%d").to_string();
        let mut content = templates::render(request.service_type, context, &today);
        Self::personalize(&mut content, preferences);

        let mut warnings = Vec::new();
        let completeness = context.completeness();
        if completeness < 100 {
            warnings.push(format!(
                "Subject context is {}% complete; content is less individualized",
                completeness
            ));
        }

        let prompt_tokens = 100 + (seed % 500) as u32;
        let completion_tokens = 200 + (content.chars().count() / 2) as u32;

        Ok(BackendOutput {
            content,
            model: self.model.clone(),
            temperature: 0.7,
            max_tokens: 2000,
            tokens: TokenUsage::new(prompt_tokens, completion_tokens),
            context_usage: Self::context_usage(context),
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subject_data::sample_subject;
    use forge_domain::ServiceType;

    fn request(id: &str) -> GenerationRequest {
        GenerationRequest::new("student_001", ServiceType::LessonPlan).with_request_id(id)
    }

    #[test]
    fn test_latency_stays_in_range_and_is_stable() {
        let backend = MockGenerationBackend::new("m")
            .with_latency(Duration::from_millis(2_000), Duration::from_millis(5_000));

        for id in ["req_1", "req_2", "req_3", "req_4"] {
            let seed = MockGenerationBackend::seed(&request(id));
            let latency = backend.latency_for(seed);
            assert!(latency >= Duration::from_millis(2_000));
            assert!(latency <= Duration::from_millis(5_000));
            assert_eq!(latency, backend.latency_for(seed));
        }
    }

    #[test]
    fn test_inverted_latency_bounds_collapse() {
        let backend = MockGenerationBackend::new("m")
            .with_latency(Duration::from_millis(300), Duration::from_millis(100));
        assert_eq!(backend.latency_for(12345), Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_generate_fills_output() {
        let backend = MockGenerationBackend::from_config(&FileBackendConfig::default());
        let context = sample_subject("student_001");

        let output = backend
            .generate(&request("req_a"), &context, None)
            .await
            .unwrap();

        assert!(output.content.contains("주간 교육계획"));
        assert_eq!(output.model, "lesson-forge-mock-1");
        assert!(output.tokens.total() > 0);
        assert_eq!(output.context_usage.completeness, 100);
        assert_eq!(output.context_usage.support_needs_addressed.len(), 3);
        assert!(output.warnings.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_preferences_and_incomplete_context() {
        let backend = MockGenerationBackend::new("m").with_latency(Duration::ZERO, Duration::ZERO);
        let prefs = UserPreferences {
            focus_areas: vec!["읽기".to_string()],
            custom_instructions: "짧게 작성".to_string(),
            ..Default::default()
        };

        let output = backend
            .generate(&request("req_b"), &SubjectContext::default(), Some(&prefs))
            .await
            .unwrap();

        assert!(output.content.contains("## 중점 영역\n- 읽기"));
        assert!(output.content.ends_with("> 짧게 작성"));
        assert_eq!(output.context_usage.completeness, 0);
        assert_eq!(output.warnings.len(), 1);
    }
}
