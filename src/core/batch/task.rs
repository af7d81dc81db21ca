//! Caller-supplied batch workload

use super::types::{BatchResult, DispatchProgress, ItemCost};
use crate::core::traits::{PromptPair, TokenEstimator};
use crate::utils::error::Result;
use std::hash::Hash;

/// Describes how a homogeneous workload is priced, prompted and parsed.
///
/// The dispatcher stays ignorant of what an item is. It asks the task for each
/// item's token cost, has it render a whole batch into one [`PromptPair`], and
/// hands the raw completion back to it for parsing.
///
/// # Example
///
/// ```rust
/// use adaptive_dispatch::{BatchResult, BatchTask, ItemCost, PromptPair, Result, TokenEstimator};
///
/// struct Summaries;
///
/// impl BatchTask for Summaries {
///     type Item = (String, String);
///     type Key = String;
///     type Value = String;
///
///     fn item_cost(&self, item: &Self::Item, estimator: &dyn TokenEstimator) -> ItemCost {
///         ItemCost::new(estimator.estimate_tokens(&item.1), 64)
///     }
///
///     fn build_prompts(&self, batch: &[Self::Item]) -> PromptPair {
///         let body: Vec<String> = batch.iter().map(|(id, text)| format!("{id}: {text}")).collect();
///         PromptPair::new("Summarize each line in one sentence.", body.join("\n"))
///     }
///
///     fn parse_result(&self, raw: &str, _batch: &[Self::Item]) -> Result<BatchResult<String, String>> {
///         Ok(raw
///             .lines()
///             .filter_map(|line| line.split_once(": "))
///             .map(|(id, summary)| (id.to_string(), summary.to_string()))
///             .collect())
///     }
/// }
/// ```
pub trait BatchTask: Send + Sync {
    type Item: Send + Sync;
    type Key: Eq + Hash + Send;
    type Value: Send;

    /// Estimated input and output tokens contributed by one item
    fn item_cost(&self, item: &Self::Item, estimator: &dyn TokenEstimator) -> ItemCost;

    /// Render a batch into the prompts for a single inference call.
    ///
    /// The system prompt should not depend on which items are in the batch; it
    /// is measured once and charged to every batch.
    fn build_prompts(&self, batch: &[Self::Item]) -> PromptPair;

    /// Turn a raw completion into keyed results.
    ///
    /// Any `Err` fails the attempt as
    /// [`DispatchError::Parsing`](crate::DispatchError::Parsing) and the batch
    /// is retried.
    fn parse_result(
        &self,
        raw: &str,
        batch: &[Self::Item],
    ) -> Result<BatchResult<Self::Key, Self::Value>>;

    /// Combine the per-batch results of a multi-batch dispatch.
    ///
    /// `parts` arrive in batch order. By default later batches overwrite
    /// earlier ones on key collision.
    fn merge(
        &self,
        parts: Vec<BatchResult<Self::Key, Self::Value>>,
    ) -> BatchResult<Self::Key, Self::Value> {
        let mut merged = BatchResult::new();
        for part in parts {
            merged.extend(part);
        }
        merged
    }

    /// Progress notification; must not block
    fn on_progress(&self, _progress: &DispatchProgress) {}
}
