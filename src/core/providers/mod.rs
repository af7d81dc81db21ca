//! Upstream provider error classification
//!
//! Wire-format adapters live outside this crate; they report failures through
//! [`ProviderError`] so the dispatcher can decide whether to retry.

pub mod unified_provider;

pub use unified_provider::ProviderError;
