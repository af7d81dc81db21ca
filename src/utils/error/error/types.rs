//! Error types for the dispatcher

use crate::core::providers::unified_provider::ProviderError;
use thiserror::Error;

/// Result type alias for the dispatcher
pub type Result<T> = std::result::Result<T, DispatchError>;

/// Main error type for the dispatcher
#[derive(Error, Debug)]
pub enum DispatchError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Model limits could not be resolved
    #[error("Model limits error: {0}")]
    ModelLimits(String),

    /// Upstream inference failure, classification preserved
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Caller-side parsing of a completion failed
    #[error("Parsing error: {0}")]
    Parsing(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Timeout errors
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// The dispatch was cancelled by the caller
    #[error("Cancelled: {0}")]
    Cancelled(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}
