//! Generation result entities.

use crate::request::ServiceType;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// Version of the metadata layout attached to every result.
pub const METADATA_SCHEMA_VERSION: &str = "1.0.0";

/// Token accounting for one generation call.
///
/// The total is always derived from its parts so it can never disagree
/// with them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct TokenUsage {
    pub prompt: u32,
    pub completion: u32,
}

impl TokenUsage {
    pub fn new(prompt: u32, completion: u32) -> Self {
        Self { prompt, completion }
    }

    pub fn total(&self) -> u32 {
        self.prompt.saturating_add(self.completion)
    }
}

impl Serialize for TokenUsage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TokenUsage", 3)?;
        state.serialize_field("prompt", &self.prompt)?;
        state.serialize_field("completion", &self.completion)?;
        state.serialize_field("total", &self.total())?;
        state.end()
    }
}

/// How a result was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationMetadata {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub tokens: TokenUsage,
    /// Wall-clock latency of the successful backend call
    pub processing_time_ms: u64,
    /// Zero-based index of the attempt that produced the result
    pub retry_count: u32,
    pub schema_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_type: Option<ServiceType>,
}

impl Default for GenerationMetadata {
    fn default() -> Self {
        Self {
            model: String::new(),
            temperature: 0.7,
            max_tokens: 2000,
            tokens: TokenUsage::default(),
            processing_time_ms: 0,
            retry_count: 0,
            schema_version: METADATA_SCHEMA_VERSION.to_string(),
            request_id: None,
            service_type: None,
        }
    }
}

impl GenerationMetadata {
    pub fn total_tokens(&self) -> u32 {
        self.tokens.total()
    }

    /// Token accounting is present and non-zero.
    pub fn has_token_accounting(&self) -> bool {
        self.total_tokens() > 0
    }
}

/// How much of the subject context a generation drew on.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ContextUsageInfo {
    pub data_sources_used: Vec<String>,
    /// Completeness percentage computed from the subject context
    pub completeness: u8,
    pub individualized_elements: Vec<String>,
    pub adaptations_applied: Vec<String>,
    pub support_needs_addressed: Vec<String>,
}

/// Coarse individualization rating derived from [`ContextUsageInfo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndividualizationLevel {
    Low,
    Medium,
    High,
}

impl ContextUsageInfo {
    pub fn individualization_level(&self) -> IndividualizationLevel {
        let total = self.individualized_elements.len()
            + self.adaptations_applied.len()
            + self.support_needs_addressed.len();
        match total {
            0..=2 => IndividualizationLevel::Low,
            3..=4 => IndividualizationLevel::Medium,
            _ => IndividualizationLevel::High,
        }
    }
}

/// Outcome of a generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub id: String,
    pub service_type: ServiceType,
    pub subject_id: String,
    /// `None` only when generation failed
    pub content: Option<String>,
    pub metadata: GenerationMetadata,
    pub context_usage: ContextUsageInfo,
    /// Always within `0..=100`
    pub quality_score: u8,
    /// Always within `0..=100`
    pub confidence_level: u8,
    /// Unix millis
    pub generated_at: u64,
    /// Unix millis at which scores were computed
    pub validated_at: Option<u64>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl GenerationResult {
    pub fn new(
        id: impl Into<String>,
        service_type: ServiceType,
        subject_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            service_type,
            subject_id: subject_id.into(),
            content: None,
            metadata: GenerationMetadata::default(),
            context_usage: ContextUsageInfo::default(),
            quality_score: 0,
            confidence_level: 0,
            generated_at: 0,
            validated_at: None,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.content.is_some()
    }

    /// Content length in UTF-16 code units, the unit the length band is
    /// defined in.
    pub fn content_len(&self) -> usize {
        self.content.as_deref().map(|c| c.encode_utf16().count()).unwrap_or(0)
    }
}
