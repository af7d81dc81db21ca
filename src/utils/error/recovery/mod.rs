//! Error recovery utilities
//!
//! Bounded retry with exponential backoff, cancellation aware.

mod retry;
mod types;

pub use retry::{RetryOutcome, RetryPolicy};
pub use types::RetryConfig;
