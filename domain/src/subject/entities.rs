//! Subject context entities.
//!
//! A [`SubjectContext`] is assembled fresh for every orchestrator run; the
//! profile may change between calls, so nothing here is cached.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SubjectProfile {
    pub id: String,
    pub name: String,
    pub grade: u8,
    pub disability_types: Vec<String>,
    pub integration_type: String,
}

impl SubjectProfile {
    pub fn is_empty(&self) -> bool {
        self.id.trim().is_empty() && self.name.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityRecord {
    pub kind: String,
    pub description: String,
    pub date: String,
    pub outcome: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SubjectGoals {
    pub short_term: Vec<String>,
    pub long_term: Vec<String>,
    pub target_skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SubjectPreferences {
    pub subjects: Vec<String>,
    pub teaching_methods: Vec<String>,
    pub session_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SubjectAnalytics {
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub average_pace: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssessmentRecord {
    pub kind: String,
    pub subject: String,
    pub score: u32,
    pub date: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SubjectObservations {
    pub behaviors: Vec<String>,
    pub social_interactions: Vec<String>,
    pub communication_patterns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Wellbeing {
    pub current_state: String,
    pub concerns: Vec<String>,
    pub interventions: Vec<String>,
}

/// Everything known about a subject that can personalize generated content.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SubjectContext {
    pub profile: SubjectProfile,
    /// Current performance level per area (e.g. "reading" -> "beginner")
    pub current_levels: BTreeMap<String, String>,
    pub recent_activities: Vec<ActivityRecord>,
    pub support_needs: Vec<String>,
    pub goals: SubjectGoals,
    pub preferences: SubjectPreferences,
    pub analytics: SubjectAnalytics,
    pub recent_assessments: Vec<AssessmentRecord>,
    pub observations: SubjectObservations,
    pub wellbeing: Wellbeing,
}

impl SubjectContext {
    /// Fields that must be non-empty for a fully individualized generation.
    pub const REQUIRED_FIELDS: [&'static str; 3] = ["profile", "current_levels", "support_needs"];

    /// Percentage (0..=100, rounded) of [`Self::REQUIRED_FIELDS`] that are
    /// non-empty. Computed from the data, never asserted by a provider.
    pub fn completeness(&self) -> u8 {
        let present = [
            !self.profile.is_empty(),
            !self.current_levels.is_empty(),
            !self.support_needs.is_empty(),
        ]
        .iter()
        .filter(|present| **present)
        .count();

        let total = Self::REQUIRED_FIELDS.len();
        ((present as f64 / total as f64) * 100.0).round() as u8
    }
}
