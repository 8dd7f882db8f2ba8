//! Map-backed subject provider.

use async_trait::async_trait;
use forge_application::{ProviderError, SubjectDataProvider};
use forge_domain::SubjectContext;
use std::collections::HashMap;
use std::path::Path;

/// Subject contexts keyed by id, loaded up front
#[derive(Debug, Default, Clone)]
pub struct InMemorySubjectDataProvider {
    subjects: HashMap<String, SubjectContext>,
}

impl InMemorySubjectDataProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a subject under its profile id.
    pub fn with_subject(mut self, context: SubjectContext) -> Self {
        self.subjects.insert(context.profile.id.clone(), context);
        self
    }

    /// Load a JSON array of subject contexts.
    pub fn from_json_file(path: &Path) -> Result<Self, ProviderError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ProviderError::Unavailable(format!("{}: {}", path.display(), e)))?;
        let contexts: Vec<SubjectContext> = serde_json::from_str(&raw)
            .map_err(|e| ProviderError::Malformed(format!("{}: {}", path.display(), e)))?;

        Ok(contexts
            .into_iter()
            .fold(Self::new(), |provider, context| provider.with_subject(context)))
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }
}

#[async_trait]
impl SubjectDataProvider for InMemorySubjectDataProvider {
    async fn fetch(&self, subject_id: &str) -> Result<SubjectContext, ProviderError> {
        self.subjects
            .get(subject_id)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(subject_id.to_string()))
    }
}
