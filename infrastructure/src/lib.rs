//! Infrastructure layer for lesson-forge
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod backend;
pub mod config;
pub mod logging;
pub mod storage;
pub mod subject_data;

// Re-export commonly used types
pub use backend::MockGenerationBackend;
pub use config::{
    ConfigLoader, ConfigValidationError, FileBackendConfig, FileConfig, FileOrchestratorConfig,
    FileOutputConfig, FileRateLimitConfig, FileStorageConfig,
};
pub use logging::JsonlRunLogger;
pub use storage::{JsonFileCounterStore, StorageError};
pub use subject_data::{InMemorySubjectDataProvider, MockSubjectDataProvider, sample_subject};
