//! Configuration file loading for lesson-forge
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `LESSON_FORGE_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./lesson-forge.toml` or `./.lesson-forge.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/lesson-forge/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileBackendConfig, FileConfig, FileOrchestratorConfig,
    FileOutputConfig, FileRateLimitConfig, FileStorageConfig,
};
pub use loader::{ConfigLoader, ENV_PREFIX};
