//! Generation requests: what the caller asks the orchestrator for.
//!
//! - [`ServiceType`]: the category of content to generate
//! - [`GenerationRequest`]: subject, service, priority and opaque context
//! - [`RequestText`]: boundary text kept as raw bytes until validated
//! - [`ServiceDetails`]: typed per-service request parameters
//! - [`UserPreferences`]: caller's tone/detail/language preferences

pub mod details;
pub mod entities;
pub mod preferences;
pub mod service_type;
pub mod text;

pub use details::{
    AdminDocumentDetails, AssessmentDetails, CounselingGuideDetails, CurriculumDetails,
    LessonPlanDetails, ServiceDetails,
};
pub use entities::{ContextValue, GenerationRequest, Priority};
pub use preferences::{DetailLevel, Tone, UserPreferences};
pub use service_type::ServiceType;
pub use text::RequestText;
