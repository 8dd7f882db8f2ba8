//! Service type: the category of content being generated.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category of educational content the orchestrator can generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    /// Individualized curriculum assignment from current levels and support needs
    CurriculumAssignment,
    /// Monthly/weekly lesson plans and IEP drafts
    LessonPlan,
    /// Assessment criteria and observation sheets
    Assessment,
    /// IEP meeting minutes, transition plans and other paperwork
    AdminDocument,
    /// Counseling guides for students and families
    CounselingGuide,
}

impl ServiceType {
    /// All service types, in catalogue order.
    pub const ALL: [ServiceType; 5] = [
        ServiceType::CurriculumAssignment,
        ServiceType::LessonPlan,
        ServiceType::Assessment,
        ServiceType::AdminDocument,
        ServiceType::CounselingGuide,
    ];

    /// Stable wire name (also used in rate-limit keys).
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::CurriculumAssignment => "curriculum_assignment",
            ServiceType::LessonPlan => "lesson_plan",
            ServiceType::Assessment => "assessment",
            ServiceType::AdminDocument => "admin_document",
            ServiceType::CounselingGuide => "counseling_guide",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ServiceType::CurriculumAssignment => "Curriculum Assignment",
            ServiceType::LessonPlan => "Lesson Plan",
            ServiceType::Assessment => "Assessment",
            ServiceType::AdminDocument => "Administrative Document",
            ServiceType::CounselingGuide => "Counseling Guide",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ServiceType::CurriculumAssignment => {
                "Assigns an individualized curriculum from the student's current levels and support needs."
            }
            ServiceType::LessonPlan => {
                "Drafts monthly/weekly lesson plans and individualized education plans."
            }
            ServiceType::Assessment => {
                "Builds per-student assessment criteria and observation records."
            }
            ServiceType::AdminDocument => {
                "Writes IEP team minutes, transition plans and other administrative documents."
            }
            ServiceType::CounselingGuide => {
                "Suggests counseling guides and support plans for students and families."
            }
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceType {
    type Err = DomainError;

    /// Accepts wire names, with `-` or `_` separators, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "curriculum_assignment" | "curriculum" => Ok(ServiceType::CurriculumAssignment),
            "lesson_plan" | "lesson" => Ok(ServiceType::LessonPlan),
            "assessment" => Ok(ServiceType::Assessment),
            "admin_document" | "admin" => Ok(ServiceType::AdminDocument),
            "counseling_guide" | "counseling" => Ok(ServiceType::CounselingGuide),
            _ => Err(DomainError::InvalidServiceType(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_round_trip() {
        for service in ServiceType::ALL {
            assert_eq!(service.as_str().parse::<ServiceType>().unwrap(), service);
        }
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!("lesson-plan".parse::<ServiceType>().unwrap(), ServiceType::LessonPlan);
        assert_eq!("LESSON".parse::<ServiceType>().unwrap(), ServiceType::LessonPlan);
        assert_eq!(
            "counseling".parse::<ServiceType>().unwrap(),
            ServiceType::CounselingGuide
        );
    }

    #[test]
    fn test_parse_unknown() {
        let err = "poetry".parse::<ServiceType>().unwrap_err();
        assert_eq!(err, DomainError::InvalidServiceType("poetry".to_string()));
    }

    #[test]
    fn test_serde_uses_wire_name() {
        let json = serde_json::to_string(&ServiceType::AdminDocument).unwrap();
        assert_eq!(json, "\"admin_document\"");
    }
}
