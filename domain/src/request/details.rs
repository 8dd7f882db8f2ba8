//! Per-service request details.
//!
//! Each service type accepts its own set of typed parameters on top of the
//! common request fields. They are forwarded to the generation backend
//! untouched; the orchestrator does not interpret them.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ServiceDetails {
    #[default]
    None,
    CurriculumAssignment(CurriculumDetails),
    LessonPlan(LessonPlanDetails),
    Assessment(AssessmentDetails),
    AdminDocument(AdminDocumentDetails),
    CounselingGuide(CounselingGuideDetails),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CurriculumDetails {
    pub current_level: String,
    pub preferred_subjects: Vec<String>,
    /// "slow", "normal" or "fast"
    pub learning_pace: String,
    pub target_skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LessonPlanDetails {
    pub target_skills: Vec<String>,
    pub teaching_methods: Vec<String>,
    pub session_minutes: u32,
    pub materials_available: Vec<String>,
    pub adaptations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AssessmentDetails {
    /// "formative", "summative" or "diagnostic"
    pub assessment_type: String,
    pub target_areas: Vec<String>,
    /// "written", "practical", "observation" or "portfolio"
    pub format: String,
    pub accommodations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AdminDocumentDetails {
    /// "report", "iep", "progress_note" or "communication"
    pub document_type: String,
    /// "parents", "administrators", "teachers" or "students"
    pub target_audience: String,
    pub formality: String,
    pub include_data: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CounselingGuideDetails {
    pub behavior_patterns: Vec<String>,
    pub emotional_state: String,
    pub social_interactions: Vec<String>,
    pub intervention_goals: Vec<String>,
}
