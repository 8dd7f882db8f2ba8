//! Generation results and their metadata.

pub mod entities;

pub use entities::{
    ContextUsageInfo, GenerationMetadata, GenerationResult, IndividualizationLevel, TokenUsage,
    METADATA_SCHEMA_VERSION,
};
