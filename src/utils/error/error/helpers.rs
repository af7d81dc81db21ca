//! Helper functions for creating and classifying errors

use super::types::DispatchError;

impl DispatchError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn model_limits<S: Into<String>>(message: S) -> Self {
        Self::ModelLimits(message.into())
    }

    pub fn parsing<S: Into<String>>(message: S) -> Self {
        Self::Parsing(message.into())
    }

    pub fn timeout<S: Into<String>>(message: S) -> Self {
        Self::Timeout(message.into())
    }

    pub fn cancelled<S: Into<String>>(message: S) -> Self {
        Self::Cancelled(message.into())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// The batch is too large for the endpoint; an unchanged resend cannot help
    pub fn is_budget_exceeded(&self) -> bool {
        matches!(self, Self::Provider(err) if err.is_budget_exceeded())
    }

    /// Whether a batch that failed with this error should be attempted again.
    ///
    /// Everything is retried except budget rejections, cancellation and
    /// misconfiguration.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Provider(err) => err.is_retryable(),
            Self::Cancelled(_) | Self::Config(_) | Self::ModelLimits(_) => false,
            Self::Parsing(_)
            | Self::Serialization(_)
            | Self::Yaml(_)
            | Self::Io(_)
            | Self::Timeout(_)
            | Self::Internal(_) => true,
        }
    }

    /// Minimum delay in seconds an upstream asked for before the next attempt
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            Self::Provider(err) => err.retry_delay(),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            Self::Cancelled(_) | Self::Provider(crate::ProviderError::Cancelled { .. })
        )
    }
}
