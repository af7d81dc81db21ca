//! Dispatch orchestration
//!
//! Resolves the token budget for the configured model, splits the work into
//! batches and fans them out through the [`StaggeredScheduler`]. A batch that
//! fails after its retries is recorded and the rest carry on.

use super::budget::TokenBudget;
use super::executor::BatchExecutor;
use super::scheduler::StaggeredScheduler;
use super::splitter::split_batches;
use super::task::BatchTask;
use super::types::{
    Batch, BatchFailure, BatchResult, DispatchPhase, DispatchProgress, DispatchResult,
};
use crate::config::{DispatchConfig, Validate};
use crate::core::traits::{InferenceClient, ModelLimitResolver, ModelLimits, TokenEstimator};
use crate::utils::ai::{ModelUtils, TokenCounter};
use crate::utils::error::{DispatchError, Result, RetryConfig, RetryPolicy};
use crate::utils::logging::LoggingUtils;
use futures::FutureExt;
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Entry point for token-budgeted batch dispatch
#[derive(Clone)]
pub struct Dispatcher {
    client: Arc<dyn InferenceClient>,
    estimator: Arc<dyn TokenEstimator>,
    resolver: Arc<dyn ModelLimitResolver>,
    config: DispatchConfig,
}

impl Dispatcher {
    /// Create a dispatcher with the built-in token counter and model table.
    ///
    /// Fails with [`DispatchError::Config`] if `config` does not validate.
    pub fn new(client: Arc<dyn InferenceClient>, config: DispatchConfig) -> Result<Self> {
        config.validate().map_err(DispatchError::Config)?;

        Ok(Self {
            client,
            estimator: Arc::new(TokenCounter::for_model(&config.model)),
            resolver: Arc::new(ModelUtils),
            config,
        })
    }

    pub fn with_estimator(mut self, estimator: Arc<dyn TokenEstimator>) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn with_limit_resolver(mut self, resolver: Arc<dyn ModelLimitResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Model limits and the budgets derived from them, without system overhead
    pub fn resolve_budget(&self) -> Result<(ModelLimits, TokenBudget)> {
        let limits = self.resolver.model_limits(&self.config.model)?;
        Ok((limits, TokenBudget::resolve(&limits, &self.config.budget)))
    }

    /// Process `items` in as few calls as the budget allows.
    ///
    /// Only a failure to resolve model limits is returned as `Err`; failed
    /// batches are reported through [`DispatchResult::failed_batches`].
    pub async fn dispatch<B: BatchTask>(
        &self,
        task: &B,
        items: Vec<B::Item>,
    ) -> Result<DispatchResult<B::Key, B::Value>> {
        self.dispatch_with_cancel(task, items, CancellationToken::new())
            .await
    }

    /// Same as [`dispatch`](Self::dispatch), stopping early once `cancel` fires.
    ///
    /// In-flight batches abort, unlaunched ones are skipped, and all of them
    /// count as failed.
    pub async fn dispatch_with_cancel<B: BatchTask>(
        &self,
        task: &B,
        items: Vec<B::Item>,
        cancel: CancellationToken,
    ) -> Result<DispatchResult<B::Key, B::Value>> {
        let Some(first) = items.first() else {
            debug!("Nothing to dispatch");
            return Ok(DispatchResult::empty());
        };

        let started = Instant::now();
        let (limits, budget) = self.resolve_budget()?;

        let probe = task.build_prompts(std::slice::from_ref(first));
        let budget = budget.with_system_overhead(self.estimator.prompt_overhead(&probe.system));
        debug!(
            "Budget for {}: {} input / {} output tokens, system overhead {}",
            self.config.model, budget.input_budget, budget.output_budget, budget.system_overhead
        );

        let item_count = items.len();
        let estimator = &*self.estimator;
        let batches = split_batches(items, &budget, |item| task.item_cost(item, estimator));
        info!(
            "Dispatching {} items in {} batch(es) to {}",
            item_count,
            batches.len(),
            self.config.model
        );

        let executor = BatchExecutor::new(
            self.client.clone(),
            RetryPolicy::new(RetryConfig::from(&self.config.retry)),
            self.config.model.clone(),
            limits.max_output,
        );

        let mut result = match <[Batch<B::Item>; 1]>::try_from(batches) {
            Ok([batch]) => self.run_single(task, &executor, batch, &cancel).await,
            Err(batches) => self.run_many(task, &executor, batches, &cancel).await,
        };
        result.duration = started.elapsed();

        if result.is_complete() {
            info!(
                "Dispatch finished: {} batch(es) in {}",
                result.total_batches,
                LoggingUtils::format_duration(result.duration)
            );
        } else {
            warn!(
                "Dispatch finished with {}/{} failed batch(es) in {}",
                result.failed_batches,
                result.total_batches,
                LoggingUtils::format_duration(result.duration)
            );
        }

        Ok(result)
    }

    /// One batch: no scheduler and no merge
    async fn run_single<B: BatchTask>(
        &self,
        task: &B,
        executor: &BatchExecutor,
        batch: Batch<B::Item>,
        cancel: &CancellationToken,
    ) -> DispatchResult<B::Key, B::Value> {
        let mut result = DispatchResult::empty();
        result.total_batches = 1;

        notify(
            task,
            DispatchPhase::SingleBatchExecuting,
            0,
            1,
            0,
            format!("Processing {} items in a single batch", batch.len()),
        );

        match executor.execute(task, &batch, cancel).await.result {
            Ok(results) => {
                result.results = results;
                notify(task, DispatchPhase::Done, 1, 1, 0, "Completed 1/1 batch".into());
            }
            Err(error) => {
                notify(
                    task,
                    DispatchPhase::Done,
                    1,
                    1,
                    1,
                    format!("Batch failed: {}", error),
                );
                result.failed_batches = 1;
                result.failures.push(BatchFailure {
                    batch_index: batch.index,
                    item_count: batch.len(),
                    error,
                });
            }
        }

        result
    }

    async fn run_many<B: BatchTask>(
        &self,
        task: &B,
        executor: &BatchExecutor,
        batches: Vec<Batch<B::Item>>,
        cancel: &CancellationToken,
    ) -> DispatchResult<B::Key, B::Value> {
        let total = batches.len();
        let scheduler = StaggeredScheduler::new(self.config.concurrency, self.config.stagger());
        notify(
            task,
            DispatchPhase::MultiBatchDispatching,
            0,
            total,
            0,
            format!(
                "Dispatching {} batches (concurrency {}, stagger {}ms)",
                total,
                scheduler.concurrency(),
                scheduler.stagger().as_millis()
            ),
        );

        let tally = Tally {
            completed: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
            total,
        };

        let units: Vec<BoxFuture<'_, Result<BatchResult<B::Key, B::Value>>>> = batches
            .iter()
            .map(|batch| settle(task, executor, batch, &tally, cancel).boxed())
            .collect();
        let outcomes = scheduler.run(units, cancel).await;

        debug!("Merging {} batch outcomes", total);
        let mut parts = Vec::with_capacity(total);
        let mut failures = Vec::new();
        for (batch, outcome) in batches.iter().zip(outcomes) {
            match outcome {
                Ok(part) => parts.push(part),
                Err(error) => {
                    warn!("Batch {} of {} failed: {}", batch.index + 1, total, error);
                    failures.push(BatchFailure {
                        batch_index: batch.index,
                        item_count: batch.len(),
                        error,
                    });
                }
            }
        }

        let results = if parts.is_empty() {
            HashMap::new()
        } else {
            notify(
                task,
                DispatchPhase::Merging,
                total,
                total,
                failures.len(),
                format!("Merging {} batch result(s)", parts.len()),
            );
            task.merge(parts)
        };
        let failed_batches = failures.len();

        let message = if failed_batches > 0 {
            format!(
                "Completed {}/{} batches ({} failed)",
                total - failed_batches,
                total,
                failed_batches
            )
        } else {
            format!("Completed {}/{} batches", total, total)
        };
        notify(task, DispatchPhase::Done, total, total, failed_batches, message);

        DispatchResult {
            results,
            failed_batches,
            total_batches: total,
            failures,
            duration: Duration::ZERO,
        }
    }
}

/// Shared completion counters for one fan-out
struct Tally {
    completed: AtomicUsize,
    failed: AtomicUsize,
    total: usize,
}

/// Execute one batch of a fan-out and report it as settled
async fn settle<B: BatchTask>(
    task: &B,
    executor: &BatchExecutor,
    batch: &Batch<B::Item>,
    tally: &Tally,
    cancel: &CancellationToken,
) -> Result<BatchResult<B::Key, B::Value>> {
    let outcome = executor.execute(task, batch, cancel).await;

    let done = tally.completed.fetch_add(1, Ordering::SeqCst) + 1;
    let failed = if outcome.result.is_err() {
        tally.failed.fetch_add(1, Ordering::SeqCst) + 1
    } else {
        tally.failed.load(Ordering::SeqCst)
    };
    debug!("Batch {} settled ({}/{})", batch.index, done, tally.total);
    notify(
        task,
        DispatchPhase::MultiBatchDispatching,
        done,
        tally.total,
        failed,
        format!("Completed batch {} ({}/{})", batch.index + 1, done, tally.total),
    );

    outcome.result
}

fn notify<B: BatchTask>(
    task: &B,
    phase: DispatchPhase,
    completed: usize,
    total: usize,
    failed: usize,
    message: String,
) {
    task.on_progress(&DispatchProgress {
        phase,
        completed,
        total,
        failed,
        message,
    });
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
