//! AI and Model utilities
//!
//! Default token estimation and model limit lookup.

pub mod counter;
pub mod models;

// Re-export commonly used types and functions
pub use counter::{ModelTokenConfig, TokenCounter};
pub use models::{ModelLimitTable, ModelUtils};
