//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// Raised when boundary text (CLI flags, config values, wire payloads) cannot
/// be parsed into a domain value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Unknown service type: {0}")]
    InvalidServiceType(String),

    #[error("Unknown priority: {0}")]
    InvalidPriority(String),

    #[error("Unknown tone: {0}")]
    InvalidTone(String),

    #[error("Unknown detail level: {0}")]
    InvalidDetailLevel(String),

    #[error("Invalid context entry (expected key=value): {0}")]
    InvalidContextEntry(String),
}
