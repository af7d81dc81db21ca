//! Configuration data models

#![allow(missing_docs)]

pub mod dispatch;

pub use dispatch::*;

/// Default concurrency ceiling
pub fn default_concurrency() -> usize {
    1
}

/// Default delay between consecutive batch launches
pub fn default_stagger_ms() -> u64 {
    5000
}

/// Default share of the context window used for input
pub fn default_input_ratio() -> f64 {
    0.6
}

/// Default absolute input ceiling regardless of context window
pub fn default_input_hard_cap() -> u32 {
    60_000
}

/// Default share of the completion limit used for output
pub fn default_output_ratio() -> f64 {
    0.8
}

/// Default retries after the first attempt
pub fn default_max_retries() -> u32 {
    2
}

/// Default base backoff in milliseconds
pub fn default_base_delay_ms() -> u64 {
    3000
}
