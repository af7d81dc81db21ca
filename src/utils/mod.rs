//! Utility modules for the dispatcher
//!
//! ## Module Organization
//!
//! - **ai**: token estimation and model limit lookup
//! - **error**: error types and retry/recovery
//! - **logging**: subscriber setup and formatting helpers

pub mod ai;
pub mod error;
pub mod logging;

// Re-export commonly used types from each module for convenience
pub use ai::{ModelLimitTable, ModelUtils, TokenCounter};
pub use logging::{LogLevel, LoggingUtils};

/// Truncate string to at most `max_chars` characters, appending an ellipsis
pub fn truncate_string(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
