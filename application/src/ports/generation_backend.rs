//! Generation backend port
//!
//! Defines the interface for the service that actually produces content.
//! How the content is produced is outside this crate.

use async_trait::async_trait;
use forge_domain::{ContextUsageInfo, GenerationRequest, SubjectContext, TokenUsage, UserPreferences};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Broad category of a backend failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendErrorKind {
    /// Transport failure; usually transient
    Network,
    /// Provider-side quota or throttling
    Quota,
    /// Output could not be decoded as text
    Encoding,
    /// Provider refused the request outright
    Rejected,
    Internal,
}

impl fmt::Display for BackendErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BackendErrorKind::Network => "network",
            BackendErrorKind::Quota => "quota",
            BackendErrorKind::Encoding => "encoding",
            BackendErrorKind::Rejected => "rejected",
            BackendErrorKind::Internal => "internal",
        };
        f.write_str(s)
    }
}

/// Error reported by a [`GenerationBackend`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} error: {message}")]
pub struct BackendError {
    pub kind: BackendErrorKind,
    pub message: String,
    /// Retrying the same request cannot succeed
    pub permanent: bool,
}

impl BackendError {
    pub fn new(kind: BackendErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            permanent: matches!(kind, BackendErrorKind::Rejected),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::Network, message)
    }

    pub fn quota(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::Quota, message)
    }

    pub fn encoding(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::Encoding, message)
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::Rejected, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::Internal, message)
    }

    pub fn permanent(mut self) -> Self {
        self.permanent = true;
        self
    }
}

/// Raw output of one backend call, before metadata normalization
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BackendOutput {
    pub content: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub tokens: TokenUsage,
    pub context_usage: ContextUsageInfo,
    pub warnings: Vec<String>,
}

/// Backend that turns a request plus subject context into content
///
/// Implementations (adapters) live in the infrastructure layer.
/// Cancellation is enforced by the caller dropping the returned future.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn generate(
        &self,
        request: &GenerationRequest,
        context: &SubjectContext,
        preferences: Option<&UserPreferences>,
    ) -> Result<BackendOutput, BackendError>;
}
