//! Error handling for the dispatcher
//!
//! This module defines the crate-level error type and its classification helpers.

#![allow(missing_docs)]

mod conversions;
mod helpers;
mod types;

pub use types::{DispatchError, Result};
