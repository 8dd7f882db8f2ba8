//! Logging infrastructure: structured run logging.
//!
//! Provides [`JsonlRunLogger`], a JSONL file writer that implements
//! the [`RunEventLogger`](forge_application::RunEventLogger) port.

mod jsonl_run_logger;

pub use jsonl_run_logger::JsonlRunLogger;
