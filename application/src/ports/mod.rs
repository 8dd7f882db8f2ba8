//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod clock;
pub mod counter_store;
pub mod generation_backend;
pub mod run_event_logger;
pub mod state_listener;
pub mod subject_data;
