//! Inference endpoint trait definitions
//!
//! The dispatcher never speaks a vendor wire format. Adapters implement
//! [`InferenceClient`] and report failures as [`ProviderError`] so that
//! budget rejections can be told apart from transient upstream trouble.

use crate::core::providers::unified_provider::ProviderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// System and user prompt for one inference call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptPair {
    /// Instructions resent with every batch
    pub system: String,
    /// Per-batch payload
    pub user: String,
}

impl PromptPair {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }
}

/// Per-call options handed to the inference client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallOptions {
    /// Target model id
    pub model: String,
    /// Completion ceiling for this call
    pub max_output_tokens: u32,
    /// Index of the batch within its dispatch call
    pub batch_index: usize,
    /// Zero-based attempt number for this batch
    pub attempt: u32,
}

/// Text-generation endpoint
///
/// # Example
///
/// ```rust
/// use adaptive_dispatch::{CallOptions, InferenceClient, PromptPair, ProviderError};
/// use async_trait::async_trait;
///
/// struct Echo;
///
/// #[async_trait]
/// impl InferenceClient for Echo {
///     async fn complete(
///         &self,
///         prompts: &PromptPair,
///         _options: &CallOptions,
///     ) -> Result<String, ProviderError> {
///         Ok(prompts.user.clone())
///     }
/// }
/// ```
#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Run one completion and return the raw response text
    async fn complete(
        &self,
        prompts: &PromptPair,
        options: &CallOptions,
    ) -> Result<String, ProviderError>;
}

#[async_trait]
impl<T: InferenceClient + ?Sized> InferenceClient for Arc<T> {
    async fn complete(
        &self,
        prompts: &PromptPair,
        options: &CallOptions,
    ) -> Result<String, ProviderError> {
        (**self).complete(prompts, options).await
    }
}
