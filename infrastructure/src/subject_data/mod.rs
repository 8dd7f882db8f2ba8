//! Subject data providers.
//!
//! - [`MockSubjectDataProvider`]: returns a fixed sample student for any id
//! - [`InMemorySubjectDataProvider`]: looks subjects up in a preloaded map

mod in_memory;
mod mock;

pub use in_memory::InMemorySubjectDataProvider;
pub use mock::{MockSubjectDataProvider, sample_subject};
