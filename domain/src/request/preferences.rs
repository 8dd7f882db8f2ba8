//! User preferences for generated content.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Professional,
    Friendly,
    Formal,
}

impl FromStr for Tone {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "professional" => Ok(Tone::Professional),
            "friendly" => Ok(Tone::Friendly),
            "formal" => Ok(Tone::Formal),
            _ => Err(DomainError::InvalidTone(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailLevel {
    Brief,
    #[default]
    Moderate,
    Detailed,
}

impl FromStr for DetailLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "brief" => Ok(DetailLevel::Brief),
            "moderate" => Ok(DetailLevel::Moderate),
            "detailed" => Ok(DetailLevel::Detailed),
            _ => Err(DomainError::InvalidDetailLevel(s.to_string())),
        }
    }
}

/// Preferences applied to one run. Never mutated once a run starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPreferences {
    pub language: String,
    pub tone: Tone,
    pub detail_level: DetailLevel,
    pub include_examples: bool,
    pub focus_areas: Vec<String>,
    pub avoid_terms: Vec<String>,
    pub custom_instructions: String,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            language: "ko".to_string(),
            tone: Tone::default(),
            detail_level: DetailLevel::default(),
            include_examples: true,
            focus_areas: Vec::new(),
            avoid_terms: Vec::new(),
            custom_instructions: String::new(),
        }
    }
}
