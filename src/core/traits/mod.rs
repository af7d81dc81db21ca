//! Collaborator traits
//!
//! Seams between the dispatcher and the systems it drives.

pub mod inference;
pub mod limits;

pub use inference::{CallOptions, InferenceClient, PromptPair};
pub use limits::{ModelLimitResolver, ModelLimits, TokenEstimator};
