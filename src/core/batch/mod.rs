//! Token-budgeted batch dispatch
//!
//! Work items are packed into as few inference calls as the model's context
//! and completion limits allow, then sent with bounded, staggered concurrency.

mod budget;
mod dispatcher;
mod executor;
mod scheduler;
mod splitter;
mod task;
mod types;


pub use budget::TokenBudget;
pub use dispatcher::Dispatcher;
pub use executor::BatchExecutor;
pub use scheduler::StaggeredScheduler;
pub use splitter::split_batches;
pub use task::BatchTask;
pub use types::{
    Batch, BatchFailure, BatchResult, DispatchPhase, DispatchProgress, DispatchResult, ItemCost,
};
