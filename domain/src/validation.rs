//! Request validation.
//!
//! Structural and encoding checks that run before anything is scheduled.
//! Validation is a pure function of the request: it never mutates input and
//! the same request always yields the same report.

use crate::request::{ContextValue, GenerationRequest};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One problem found in a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "problem", rename_all = "snake_case")]
pub enum ValidationProblem {
    /// A required field is empty
    MissingField { field: String },
    /// A text field does not survive a UTF-8 decode/encode round trip
    InvalidEncoding { field: String },
}

impl ValidationProblem {
    pub fn is_encoding(&self) -> bool {
        matches!(self, ValidationProblem::InvalidEncoding { .. })
    }
}

impl fmt::Display for ValidationProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationProblem::MissingField { field } => write!(f, "{} is required", field),
            ValidationProblem::InvalidEncoding { field } => {
                write!(f, "{} contains invalid UTF-8 text", field)
            }
        }
    }
}

/// Outcome of [`RequestValidator::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub problems: Vec<ValidationProblem>,
}

impl ValidationReport {
    fn from_problems(problems: Vec<ValidationProblem>) -> Self {
        Self {
            valid: problems.is_empty(),
            problems,
        }
    }

    /// Problems as human-readable strings, in check order.
    pub fn messages(&self) -> Vec<String> {
        self.problems.iter().map(|p| p.to_string()).collect()
    }

    /// Every problem is an encoding problem (and there is at least one).
    pub fn is_encoding_only(&self) -> bool {
        !self.problems.is_empty() && self.problems.iter().all(ValidationProblem::is_encoding)
    }
}

/// Validates generation requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestValidator;

impl RequestValidator {
    pub fn new() -> Self {
        Self
    }

    /// Check, in order: required fields, text field encoding, then the
    /// encoding of every text value in `additional_context`.
    ///
    /// `service_type` is a closed enum and cannot be missing or mis-encoded.
    pub fn validate(&self, request: &GenerationRequest) -> ValidationReport {
        let mut problems = Vec::new();

        if request.subject_id.is_blank() {
            problems.push(ValidationProblem::MissingField {
                field: "subject_id".to_string(),
            });
        }
        if request.request_id.is_blank() {
            problems.push(ValidationProblem::MissingField {
                field: "request_id".to_string(),
            });
        }

        for (field, text) in [
            ("subject_id", &request.subject_id),
            ("request_id", &request.request_id),
        ] {
            if !text.is_valid_utf8() {
                problems.push(ValidationProblem::InvalidEncoding {
                    field: field.to_string(),
                });
            }
        }

        for (key, value) in &request.additional_context {
            if let ContextValue::Text(text) = value
                && !text.is_valid_utf8()
            {
                problems.push(ValidationProblem::InvalidEncoding {
                    field: format!("additional_context.{}", key),
                });
            }
        }

        ValidationReport::from_problems(problems)
    }
}
