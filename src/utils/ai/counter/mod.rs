//! Token counting utilities
//!
//! This module provides the default [`TokenEstimator`](crate::core::traits::TokenEstimator).

pub mod token_counter;
pub mod types;

pub use token_counter::TokenCounter;
pub use types::ModelTokenConfig;
