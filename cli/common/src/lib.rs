//! Shared utilities for aws-services CLI binaries.

pub mod args;
pub mod logging;

pub use args::LogLevel;
pub use logging::init_logging;
