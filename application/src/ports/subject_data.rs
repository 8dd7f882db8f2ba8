//! Subject data port
//!
//! Defines how the application retrieves a subject's learning context.

use async_trait::async_trait;
use forge_domain::SubjectContext;
use thiserror::Error;

/// Errors that can occur while fetching subject data
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Subject not found: {0}")]
    NotFound(String),

    #[error("Subject data unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed subject data: {0}")]
    Malformed(String),
}

/// Source of [`SubjectContext`] records
///
/// Called once per run; results are never cached by the application.
#[async_trait]
pub trait SubjectDataProvider: Send + Sync {
    async fn fetch(&self, subject_id: &str) -> Result<SubjectContext, ProviderError>;
}
