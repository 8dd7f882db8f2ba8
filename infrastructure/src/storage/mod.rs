//! Durable storage adapters.

mod json_file;

pub use json_file::{JsonFileCounterStore, StorageError};
