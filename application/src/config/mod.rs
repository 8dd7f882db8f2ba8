//! Application-level configuration.
//!
//! - [`OrchestratorConfig`]: retry, timeout, rate-limit and scoring control

pub mod orchestrator_config;

pub use orchestrator_config::OrchestratorConfig;
