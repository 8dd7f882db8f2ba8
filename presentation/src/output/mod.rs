//! Output formatting for generation results

pub mod console;
pub mod formatter;
