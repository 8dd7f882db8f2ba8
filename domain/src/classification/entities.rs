//! Classified error entity.

use super::kind::{ErrorKind, Severity};
use crate::rate_limit::RateLimitSnapshot;
use crate::request::ServiceType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// ARIA live-region urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiveRegion {
    Polite,
    Assertive,
}

impl LiveRegion {
    pub fn for_severity(severity: Severity) -> Self {
        if severity >= Severity::High {
            LiveRegion::Assertive
        } else {
            LiveRegion::Polite
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LiveRegion::Polite => "polite",
            LiveRegion::Assertive => "assertive",
        }
    }
}

/// Accessibility annotation a presentation layer can render verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessibilityDescriptor {
    pub role: String,
    pub live: LiveRegion,
    pub label: String,
}

impl AccessibilityDescriptor {
    pub fn for_kind(kind: ErrorKind) -> Self {
        Self {
            role: "alert".to_string(),
            live: LiveRegion::for_severity(kind.severity()),
            label: format!("Error: {}", kind.user_facing_message()),
        }
    }
}

/// Diagnostic payload for logs. Never shown to end users.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ErrorDiagnostics {
    /// Original cause, as text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
    /// Validation problems, if any
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub problems: Vec<String>,
    /// Attempts made before giving up
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<RateLimitSnapshot>,
}

/// A failure normalized into the fixed taxonomy.
///
/// Created once at the point of failure and never mutated afterward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedError {
    pub kind: ErrorKind,
    pub code: String,
    /// Technical message (for logs and developers)
    pub message: String,
    /// Stable message for end users, derived from `code` only
    pub user_facing_message: String,
    pub severity: Severity,
    pub retryable: bool,
    /// Unix millis
    pub timestamp: u64,
    pub correlation_id: String,
    pub service_type: ServiceType,
    pub accessibility: AccessibilityDescriptor,
    pub troubleshooting: String,
    pub diagnostics: ErrorDiagnostics,
}

impl ClassifiedError {
    /// Build an error whose presentation fields all derive from `kind`.
    pub fn new(
        kind: ErrorKind,
        message: impl Into<String>,
        service_type: ServiceType,
        timestamp: u64,
        correlation_id: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            code: kind.code().to_string(),
            message: message.into(),
            user_facing_message: kind.user_facing_message().to_string(),
            severity: kind.severity(),
            retryable: kind.default_retryable(),
            timestamp,
            correlation_id: correlation_id.into(),
            service_type,
            accessibility: AccessibilityDescriptor::for_kind(kind),
            troubleshooting: kind.troubleshooting().to_string(),
            diagnostics: ErrorDiagnostics::default(),
        }
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: ErrorDiagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }
}

impl fmt::Display for ClassifiedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ClassifiedError {}
