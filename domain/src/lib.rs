//! Domain layer for lesson-forge
//!
//! This crate contains the entities, value objects and pure rules of the
//! generation pipeline. It has no dependencies on async runtimes,
//! infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Generation Request
//!
//! A [`GenerationRequest`] names a subject, a [`ServiceType`] and an opaque
//! bag of additional context. Boundary text is held as [`RequestText`] so
//! malformed UTF-8 survives until [`RequestValidator`] can reject it.
//!
//! ## Pure Rules
//!
//! - **Validation**: [`RequestValidator`] collects every problem, not just the first
//! - **Rate limiting**: [`SlidingWindow`] decides admission over a timestamp log
//! - **Scoring**: [`QualityScorer`] derives quality and confidence from a result
//! - **Classification**: [`ErrorKind`] is the closed taxonomy every failure maps to

pub mod classification;
pub mod config;
pub mod core;
pub mod generation;
pub mod quality;
pub mod rate_limit;
pub mod request;
pub mod run;
pub mod subject;
pub mod validation;

// Re-export commonly used types
pub use classification::{
    AccessibilityDescriptor, ClassifiedError, ErrorDiagnostics, ErrorKind, LiveRegion, Severity,
};
pub use config::OutputFormat;
pub use core::error::DomainError;
pub use generation::{
    ContextUsageInfo, GenerationMetadata, GenerationResult, IndividualizationLevel, TokenUsage,
};
pub use quality::{QualityScorer, QualityScores, ScoringWeights};
pub use rate_limit::{RateLimitDecision, RateLimitSnapshot, SlidingWindow, rate_limit_key};
pub use request::{
    ContextValue, DetailLevel, GenerationRequest, Priority, RequestText, ServiceDetails,
    ServiceType, Tone, UserPreferences,
};
pub use run::{OrchestratorRunState, RunStatus};
pub use subject::{SubjectContext, SubjectProfile};
pub use validation::{RequestValidator, ValidationProblem, ValidationReport};
