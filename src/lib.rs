//! # adaptive-dispatch
//!
//! Token-budgeted batch dispatch for LLM inference endpoints.
//!
//! ## Features
//!
//! - **Budget-aware splitting**: items are packed into as few calls as the
//!   model's context window and completion limit allow
//! - **Bounded concurrency**: batches run with a concurrency ceiling and a
//!   fixed stagger between launches
//! - **Retry with backoff**: transient failures are retried, oversized
//!   requests are not
//! - **Partial-failure isolation**: a failed batch never takes its siblings down
//! - **Pluggable collaborators**: bring your own inference client, token
//!   estimator and model limit table
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use adaptive_dispatch::{
//!     BatchResult, BatchTask, CallOptions, DispatchConfig, Dispatcher, InferenceClient,
//!     ItemCost, PromptPair, ProviderError, Result, TokenEstimator,
//! };
//! use async_trait::async_trait;
//! use std::sync::Arc;
//!
//! struct MyClient;
//!
//! #[async_trait]
//! impl InferenceClient for MyClient {
//!     async fn complete(
//!         &self,
//!         prompts: &PromptPair,
//!         _options: &CallOptions,
//!     ) -> std::result::Result<String, ProviderError> {
//!         Ok(prompts.user.to_uppercase())
//!     }
//! }
//!
//! struct Shout;
//!
//! impl BatchTask for Shout {
//!     type Item = String;
//!     type Key = String;
//!     type Value = String;
//!
//!     fn item_cost(&self, item: &String, estimator: &dyn TokenEstimator) -> ItemCost {
//!         ItemCost::new(estimator.estimate_tokens(item), estimator.estimate_tokens(item))
//!     }
//!
//!     fn build_prompts(&self, batch: &[String]) -> PromptPair {
//!         PromptPair::new("Repeat every line in upper case.", batch.join("\n"))
//!     }
//!
//!     fn parse_result(&self, raw: &str, batch: &[String]) -> Result<BatchResult<String, String>> {
//!         Ok(batch.iter().cloned().zip(raw.lines().map(str::to_string)).collect())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = DispatchConfig::new("gpt-4o").with_concurrency(4);
//!     let dispatcher = Dispatcher::new(Arc::new(MyClient), config)?;
//!
//!     let items = vec!["hello".to_string(), "world".to_string()];
//!     let outcome = dispatcher.dispatch(&Shout, items).await?;
//!
//!     println!(
//!         "{} results, {}/{} batches failed",
//!         outcome.results.len(),
//!         outcome.failed_batches,
//!         outcome.total_batches
//!     );
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod utils;

// Re-export main types
pub use config::{BudgetConfig, DispatchConfig, RetrySettings, Validate};
pub use utils::error::{DispatchError, Result, RetryConfig, RetryPolicy};

pub use core::batch::{
    Batch, BatchExecutor, BatchFailure, BatchResult, BatchTask, DispatchPhase, DispatchProgress,
    DispatchResult, Dispatcher, ItemCost, StaggeredScheduler, TokenBudget, split_batches,
};
pub use core::providers::ProviderError;
pub use core::traits::{
    CallOptions, InferenceClient, ModelLimitResolver, ModelLimits, PromptPair, TokenEstimator,
};
pub use utils::ai::{ModelLimitTable, ModelTokenConfig, ModelUtils, TokenCounter};
pub use utils::logging::{LogLevel, LoggingUtils};

pub use tokio_util::sync::CancellationToken;

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
