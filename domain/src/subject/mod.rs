//! Subject (student) context used to personalize generation.

pub mod entities;

pub use entities::{
    ActivityRecord, AssessmentRecord, SubjectAnalytics, SubjectContext, SubjectGoals,
    SubjectObservations, SubjectPreferences, SubjectProfile, Wellbeing,
};
