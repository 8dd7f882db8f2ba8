//! Error taxonomy for generation failures.
//!
//! Every failure that leaves the orchestrator is a [`ClassifiedError`]: a
//! closed [`ErrorKind`] plus the presentation data (user-facing text,
//! accessibility descriptor, retryable flag) derived from it, so callers
//! never need error-specific branching.

pub mod entities;
pub mod kind;

pub use entities::{AccessibilityDescriptor, ClassifiedError, ErrorDiagnostics, LiveRegion};
pub use kind::{ErrorKind, Severity};
