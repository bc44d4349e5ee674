//! Logging and tracing setup.

mod logging;

pub use logging::{setup_logging, LoggingGuard};
