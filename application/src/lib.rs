//! Application layer for lesson-forge
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::OrchestratorConfig;
pub use ports::{
    clock::{Clock, ManualClock, SystemClock},
    counter_store::{CounterStore, InMemoryCounterStore},
    generation_backend::{BackendError, BackendErrorKind, BackendOutput, GenerationBackend},
    run_event_logger::{NoRunEventLogger, RunEvent, RunEventLogger},
    state_listener::{NoStateListener, RunStateListener},
    subject_data::{ProviderError, SubjectDataProvider},
};
pub use use_cases::context_assembler::ContextAssembler;
pub use use_cases::error_classifier::ErrorClassifier;
pub use use_cases::failure::GenerationFailure;
pub use use_cases::generation_invoker::GenerationInvoker;
pub use use_cases::orchestrator::{Orchestrator, OrchestratorBuilder, SubscriptionId};
pub use use_cases::rate_limiter::{RateLimitPermit, RateLimiter};
pub use use_cases::retry::{NoRetryObserver, RetryController, RetryObserver};
