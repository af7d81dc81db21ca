//! Core functionality for the dispatcher
//!
//! This module contains the dispatch pipeline and the traits it drives.

pub mod batch;
pub mod providers;
pub mod traits;
