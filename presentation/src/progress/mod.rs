//! Progress reporting for generation runs

pub mod reporter;
