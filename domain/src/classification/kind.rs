//! Closed set of error kinds and their fixed presentation tables.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How serious a failure is for the person waiting on the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

/// Error kinds, one per code.
///
/// | Code | Retryable | Severity |
/// |------|-----------|----------|
/// | `VALIDATION_FAILED` | no | low |
/// | `RATE_LIMIT_EXCEEDED` | yes | medium |
/// | `CONTEXT_BUILD_FAILED` | yes | medium |
/// | `BACKEND_ERROR` | yes, unless permanent | high |
/// | `TIMEOUT_ERROR` | yes | medium |
/// | `MAX_RETRIES_EXCEEDED` | no | high |
/// | `UTF8_ENCODING_ERROR` | no | low |
/// | `UNKNOWN_ERROR` | yes | high |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    ValidationFailed,
    RateLimitExceeded,
    ContextBuildFailed,
    BackendError,
    TimeoutError,
    MaxRetriesExceeded,
    #[serde(rename = "UTF8_ENCODING_ERROR")]
    Utf8EncodingError,
    UnknownError,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 8] = [
        ErrorKind::ValidationFailed,
        ErrorKind::RateLimitExceeded,
        ErrorKind::ContextBuildFailed,
        ErrorKind::BackendError,
        ErrorKind::TimeoutError,
        ErrorKind::MaxRetriesExceeded,
        ErrorKind::Utf8EncodingError,
        ErrorKind::UnknownError,
    ];

    /// Machine-checkable code.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::ValidationFailed => "VALIDATION_FAILED",
            ErrorKind::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            ErrorKind::ContextBuildFailed => "CONTEXT_BUILD_FAILED",
            ErrorKind::BackendError => "BACKEND_ERROR",
            ErrorKind::TimeoutError => "TIMEOUT_ERROR",
            ErrorKind::MaxRetriesExceeded => "MAX_RETRIES_EXCEEDED",
            ErrorKind::Utf8EncodingError => "UTF8_ENCODING_ERROR",
            ErrorKind::UnknownError => "UNKNOWN_ERROR",
        }
    }

    /// Retryable flag before any failure-specific override.
    pub fn default_retryable(&self) -> bool {
        match self {
            ErrorKind::ValidationFailed
            | ErrorKind::MaxRetriesExceeded
            | ErrorKind::Utf8EncodingError => false,
            ErrorKind::RateLimitExceeded
            | ErrorKind::ContextBuildFailed
            | ErrorKind::BackendError
            | ErrorKind::TimeoutError
            | ErrorKind::UnknownError => true,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            ErrorKind::ValidationFailed | ErrorKind::Utf8EncodingError => Severity::Low,
            ErrorKind::RateLimitExceeded
            | ErrorKind::ContextBuildFailed
            | ErrorKind::TimeoutError => Severity::Medium,
            ErrorKind::BackendError | ErrorKind::MaxRetriesExceeded | ErrorKind::UnknownError => {
                Severity::High
            }
        }
    }

    /// Stable text shown to end users. Depends on the code only and never
    /// contains internal details.
    pub fn user_facing_message(&self) -> &'static str {
        match self {
            ErrorKind::ValidationFailed => {
                "The request could not be validated. Please check the entered information."
            }
            ErrorKind::RateLimitExceeded => {
                "Too many generation requests. Please wait a moment and try again."
            }
            ErrorKind::ContextBuildFailed => {
                "Something went wrong while loading the student's information."
            }
            ErrorKind::BackendError => {
                "There was a problem connecting to the content generation service."
            }
            ErrorKind::TimeoutError => "Content generation took too long. Please try again.",
            ErrorKind::MaxRetriesExceeded => {
                "Content generation failed after several attempts. Please try again later."
            }
            ErrorKind::Utf8EncodingError => {
                "A text encoding problem occurred. Please check for unusual special characters."
            }
            ErrorKind::UnknownError => "An unexpected error occurred during content generation.",
        }
    }

    /// Short self-help steps for the person who hit the error.
    pub fn troubleshooting(&self) -> &'static str {
        match self {
            ErrorKind::ValidationFailed => {
                "Check that every required field is filled in and uses the expected format."
            }
            ErrorKind::Utf8EncodingError => {
                "Remove emoji or unusual symbols, or type the text instead of pasting it."
            }
            ErrorKind::RateLimitExceeded => "Wait for the current window to pass, then retry.",
            ErrorKind::TimeoutError => "Retry; if it keeps happening, request less detail.",
            ErrorKind::ContextBuildFailed | ErrorKind::BackendError => {
                "Check the network connection and try again in a moment."
            }
            ErrorKind::MaxRetriesExceeded | ErrorKind::UnknownError => {
                "If the problem persists, contact support with the error reference."
            }
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_table() {
        assert!(!ErrorKind::ValidationFailed.default_retryable());
        assert!(!ErrorKind::Utf8EncodingError.default_retryable());
        assert!(!ErrorKind::MaxRetriesExceeded.default_retryable());
        assert!(ErrorKind::RateLimitExceeded.default_retryable());
        assert!(ErrorKind::TimeoutError.default_retryable());
        assert!(ErrorKind::UnknownError.default_retryable());
    }

    #[test]
    fn test_serde_matches_code() {
        for kind in ErrorKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.code()));
        }
    }

    #[test]
    fn test_user_messages_do_not_leak_codes() {
        for kind in ErrorKind::ALL {
            let message = kind.user_facing_message();
            assert!(!message.is_empty());
            assert!(!message.contains(kind.code()));
            assert!(!message.contains('_'));
        }
    }
}
