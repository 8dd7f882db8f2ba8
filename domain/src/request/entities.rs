//! Generation request entity.

use super::details::ServiceDetails;
use super::service_type::ServiceType;
use super::text::RequestText;
use crate::core::error::DomainError;
use crate::core::ids::unique_id;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Scheduling priority of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Normal => "normal",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "normal" => Ok(Priority::Normal),
            "high" => Ok(Priority::High),
            _ => Err(DomainError::InvalidPriority(s.to_string())),
        }
    }
}

/// A value in the opaque additional-context map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContextValue {
    /// Boundary text, checked by the validator
    Text(RequestText),
    /// Any other structured value
    Json(serde_json::Value),
}

impl From<&str> for ContextValue {
    fn from(s: &str) -> Self {
        ContextValue::Text(RequestText::from(s))
    }
}

impl From<RequestText> for ContextValue {
    fn from(text: RequestText) -> Self {
        ContextValue::Text(text)
    }
}

impl From<serde_json::Value> for ContextValue {
    fn from(value: serde_json::Value) -> Self {
        ContextValue::Json(value)
    }
}

/// A request to generate content for one subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub subject_id: RequestText,
    pub service_type: ServiceType,
    pub request_id: RequestText,
    #[serde(default)]
    pub priority: Priority,
    /// Optional deadline (Unix millis); informational for the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<u64>,
    #[serde(default)]
    pub additional_context: BTreeMap<String, ContextValue>,
    #[serde(default)]
    pub details: ServiceDetails,
}

impl GenerationRequest {
    /// Create a request with a freshly minted request id.
    pub fn new(subject_id: impl Into<RequestText>, service_type: ServiceType) -> Self {
        Self {
            subject_id: subject_id.into(),
            service_type,
            request_id: RequestText::new(unique_id("req")),
            priority: Priority::default(),
            deadline: None,
            additional_context: BTreeMap::new(),
            details: ServiceDetails::None,
        }
    }

    // ==================== Builder Methods ====================

    pub fn with_request_id(mut self, request_id: impl Into<RequestText>) -> Self {
        self.request_id = request_id.into();
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_deadline(mut self, deadline_millis: u64) -> Self {
        self.deadline = Some(deadline_millis);
        self
    }

    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<ContextValue>) -> Self {
        self.additional_context.insert(key.into(), value.into());
        self
    }

    pub fn with_details(mut self, details: ServiceDetails) -> Self {
        self.details = details;
        self
    }

    /// Parse a `key=value` pair into a text context entry.
    pub fn parse_context_entry(entry: &str) -> Result<(String, ContextValue), DomainError> {
        match entry.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                Ok((key.trim().to_string(), ContextValue::from(value.trim())))
            }
            _ => Err(DomainError::InvalidContextEntry(entry.to_string())),
        }
    }
}
