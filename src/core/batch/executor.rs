//! Single-batch execution with bounded retry

use super::task::BatchTask;
use super::types::{Batch, BatchResult};
use crate::core::traits::{CallOptions, InferenceClient};
use crate::utils::error::{DispatchError, RetryOutcome, RetryPolicy};
use crate::utils::truncate_string;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Characters of a raw completion quoted when parsing fails
const RESPONSE_PREVIEW_CHARS: usize = 200;

/// Sends one batch to the inference endpoint and parses the answer.
///
/// Performs no concurrency control of its own; the caller decides how many
/// executions run at once.
#[derive(Clone)]
pub struct BatchExecutor {
    client: Arc<dyn InferenceClient>,
    policy: RetryPolicy,
    model: String,
    max_output_tokens: u32,
}

impl BatchExecutor {
    pub fn new(
        client: Arc<dyn InferenceClient>,
        policy: RetryPolicy,
        model: impl Into<String>,
        max_output_tokens: u32,
    ) -> Self {
        Self {
            client,
            policy,
            model: model.into(),
            max_output_tokens,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run `batch` until it parses, hits a non-retryable error, exhausts its
    /// attempts or `cancel` fires.
    ///
    /// Prompts are rendered once and resent unchanged on every attempt.
    pub async fn execute<B: BatchTask>(
        &self,
        task: &B,
        batch: &Batch<B::Item>,
        cancel: &CancellationToken,
    ) -> RetryOutcome<BatchResult<B::Key, B::Value>> {
        let prompts = task.build_prompts(&batch.items);
        let prompts = &prompts;
        debug!(
            "Executing batch {} ({} items, ~{} input tokens)",
            batch.index,
            batch.len(),
            batch.input_tokens
        );

        let outcome = self
            .policy
            .call(cancel, move |attempt| {
                let options = CallOptions {
                    model: self.model.clone(),
                    max_output_tokens: self.max_output_tokens,
                    batch_index: batch.index,
                    attempt,
                };

                async move {
                    let raw = self.client.complete(prompts, &options).await?;
                    // Any parser error is a retryable parse failure, whatever its variant
                    task.parse_result(&raw, &batch.items).map_err(|e| {
                        debug!(
                            "Batch {} attempt {} returned unparseable output ({}): {}",
                            batch.index,
                            attempt,
                            e,
                            truncate_string(&raw, RESPONSE_PREVIEW_CHARS)
                        );
                        match e {
                            DispatchError::Parsing(_) => e,
                            other => DispatchError::parsing(other.to_string()),
                        }
                    })
                }
            })
            .await;

        if let Err(e) = &outcome.result {
            warn!(
                "Batch {} failed after {} attempt(s): {}",
                batch.index, outcome.attempts, e
            );
        }

        outcome
    }
}

impl std::fmt::Debug for BatchExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchExecutor")
            .field("policy", &self.policy)
            .field("model", &self.model)
            .field("max_output_tokens", &self.max_output_tokens)
            .finish()
    }
}
