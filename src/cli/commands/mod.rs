//! CLI command implementations.

pub mod forecast;
pub mod history;
pub mod resolve;
pub mod validate;
