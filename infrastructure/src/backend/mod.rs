//! Generation backend adapters.

mod mock;
mod templates;

pub use mock::MockGenerationBackend;
