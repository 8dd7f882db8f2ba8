//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod context_assembler;
pub mod error_classifier;
pub mod failure;
pub mod generation_invoker;
pub mod orchestrator;
pub mod rate_limiter;
pub mod retry;
pub(crate) mod shared;

#[cfg(test)]
pub(crate) mod testing;
