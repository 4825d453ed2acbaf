//! CLI command implementations.

pub mod admin;
pub mod gifts;
pub mod migrate;
