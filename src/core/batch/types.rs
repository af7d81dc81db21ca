//! Batch dispatch types and data structures

use crate::utils::error::DispatchError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Results produced by a single batch, keyed by caller-defined ids
pub type BatchResult<K, V> = HashMap<K, V>;

/// Estimated token cost of one work item
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCost {
    /// Tokens the item adds to the user prompt
    pub input_tokens: u32,
    /// Tokens the item is expected to add to the completion
    pub output_tokens: u32,
}

impl ItemCost {
    pub const fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }
}

/// Contiguous, non-empty run of work items sent in one inference call
#[derive(Debug, Clone, PartialEq)]
pub struct Batch<T> {
    /// Zero-based position within the dispatch call
    pub index: usize,
    /// Items in their original order
    pub items: Vec<T>,
    /// Estimated input tokens, system overhead included
    pub input_tokens: u64,
    /// Estimated output tokens
    pub output_tokens: u64,
}

impl<T> Batch<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A batch that did not produce results
#[derive(Debug)]
pub struct BatchFailure {
    pub batch_index: usize,
    pub item_count: usize,
    /// Last error seen for this batch
    pub error: DispatchError,
}

/// Aggregate outcome of one dispatch call
#[derive(Debug)]
pub struct DispatchResult<K, V> {
    /// Merged results of every successful batch
    pub results: HashMap<K, V>,
    /// Number of batches that failed after retries
    pub failed_batches: usize,
    /// Number of batches the input was split into
    pub total_batches: usize,
    /// Per-batch failure details, in batch order
    pub failures: Vec<BatchFailure>,
    /// Wall-clock time of the whole call
    pub duration: Duration,
}

impl<K, V> DispatchResult<K, V> {
    /// Result of dispatching zero items
    pub fn empty() -> Self {
        Self {
            results: HashMap::new(),
            failed_batches: 0,
            total_batches: 0,
            failures: Vec::new(),
            duration: Duration::ZERO,
        }
    }

    pub fn succeeded_batches(&self) -> usize {
        self.total_batches - self.failed_batches
    }

    /// Every batch succeeded
    pub fn is_complete(&self) -> bool {
        self.failed_batches == 0
    }

    /// At least one batch was attempted and none succeeded
    pub fn is_total_failure(&self) -> bool {
        self.total_batches > 0 && self.failed_batches == self.total_batches
    }
}

/// Reported phase of a dispatch call.
///
/// Budget resolution and splitting happen before the first report, so they
/// have no phase of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchPhase {
    SingleBatchExecuting,
    MultiBatchDispatching,
    Merging,
    Done,
}

/// Progress snapshot handed to [`BatchTask::on_progress`](super::BatchTask::on_progress)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchProgress {
    pub phase: DispatchPhase,
    /// Batches settled so far, failed ones included
    pub completed: usize,
    pub total: usize,
    pub failed: usize,
    /// Human-readable status line
    pub message: String,
}
