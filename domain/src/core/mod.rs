//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`]: parse errors for boundary text
//! - [`string`]: UTF-8 aware string helpers
//! - [`ids`]: process-unique identifier generation

pub mod error;
pub mod ids;
pub mod string;
