//! Token estimation and model limit lookup
//!
//! Both are pure lookups from the dispatcher's point of view.

use crate::utils::error::Result;
use serde::{Deserialize, Serialize};

/// Hard limits advertised for a model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelLimits {
    /// Maximum input context in tokens
    pub context_window: u32,
    /// Maximum completion size in tokens
    pub max_output: u32,
}

impl ModelLimits {
    pub const fn new(context_window: u32, max_output: u32) -> Self {
        Self {
            context_window,
            max_output,
        }
    }
}

/// Approximate token counting
pub trait TokenEstimator: Send + Sync {
    /// Deterministic, I/O free estimate of the number of tokens in `text`
    fn estimate_tokens(&self, text: &str) -> u32;

    /// Tokens every batch spends before its first item: the system prompt plus
    /// any request and message framing the estimator accounts for
    fn prompt_overhead(&self, system: &str) -> u32 {
        self.estimate_tokens(system)
    }
}

/// Model id to limits lookup
///
/// Implementations should hand back conservative defaults for ids they do not
/// know. An `Err` aborts the whole dispatch call before any batch is sent.
pub trait ModelLimitResolver: Send + Sync {
    fn model_limits(&self, model: &str) -> Result<ModelLimits>;
}

impl<F> TokenEstimator for F
where
    F: Fn(&str) -> u32 + Send + Sync,
{
    fn estimate_tokens(&self, text: &str) -> u32 {
        self(text)
    }
}
