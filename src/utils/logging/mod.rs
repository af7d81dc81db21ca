//! Logging utilities
//!
//! Thin setup helpers around `tracing_subscriber`; the rest of the crate logs
//! through `tracing` macros directly.

pub mod types;
pub mod utils;

pub use types::LogLevel;
pub use utils::LoggingUtils;
