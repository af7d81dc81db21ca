//! Unified Provider Error Handling
//!
//! Single error type returned by every [`InferenceClient`](crate::core::traits::InferenceClient)
//! implementation. The dispatcher only ever branches on the classification exposed here,
//! never on message text.
//!
//! | Variant | Purpose | HTTP Status | Retried by the dispatcher |
//! |------|------|------------|--------|
//! | RateLimit | Upstream throttling | 429 | Yes (honours `retry_after`) |
//! | Network | Connection failure | 503 | Yes |
//! | Timeout | Attempt took too long | 503 | Yes |
//! | ApiError | Any other upstream status | status | Yes |
//! | ProviderUnavailable | Upstream down | 503 | Yes |
//! | ResponseParsing | Malformed completion | 502 | Yes |
//! | ContextLengthExceeded | Request too large | 413 | **No** |
//! | TokenLimitExceeded | Request too large | 413 | **No** |
//! | Cancelled | Caller aborted | 499 | **No** |
//! | Other | Anything else | 500 | Yes |
//!
//! ## Usage
//!
//! ```rust
//! use adaptive_dispatch::ProviderError;
//!
//! let err = ProviderError::context_length_exceeded("openai", 128_000, 150_000);
//! assert!(err.is_budget_exceeded());
//! assert!(!err.is_retryable());
//!
//! let err = ProviderError::rate_limit("anthropic", Some(20));
//! assert!(err.is_retryable());
//! assert_eq!(err.retry_delay(), Some(20));
//! ```

/// Unified provider error type
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    #[error("Rate limit exceeded for {provider}: {message}")]
    RateLimit {
        provider: &'static str,
        message: String,
        /// Seconds the upstream asked us to wait
        retry_after: Option<u64>,
    },

    #[error("Network error for {provider}: {message}")]
    Network {
        provider: &'static str,
        message: String,
    },

    #[error("Timeout for {provider}: {message}")]
    Timeout {
        provider: &'static str,
        message: String,
    },

    /// API error with status code
    #[error("API error for {provider} (status {status}): {message}")]
    ApiError {
        provider: &'static str,
        status: u16,
        message: String,
    },

    #[error("Provider {provider} is unavailable: {message}")]
    ProviderUnavailable {
        provider: &'static str,
        message: String,
    },

    /// Context length exceeded with structured limits
    #[error("Context length exceeded for {provider}: max {max} tokens, got {actual} tokens")]
    ContextLengthExceeded {
        provider: &'static str,
        max: usize,
        actual: usize,
    },

    /// Token limit exceeded (completion side, or an unstructured budget rejection)
    #[error("Token limit exceeded for {provider}: {message}")]
    TokenLimitExceeded {
        provider: &'static str,
        message: String,
    },

    #[error("Response parsing error for {provider}: {message}")]
    ResponseParsing {
        provider: &'static str,
        message: String,
    },

    #[error("Request cancelled for {provider}: {reason}")]
    Cancelled {
        provider: &'static str,
        reason: String,
    },

    #[error("Error from {provider}: {message}")]
    Other {
        provider: &'static str,
        message: String,
    },
}

impl ProviderError {
    pub fn rate_limit(provider: &'static str, retry_after: Option<u64>) -> Self {
        let message = match retry_after {
            Some(secs) => format!("retry after {} seconds", secs),
            None => "rate limit exceeded".to_string(),
        };
        Self::RateLimit {
            provider,
            message,
            retry_after,
        }
    }

    pub fn network(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Network {
            provider,
            message: message.into(),
        }
    }

    pub fn timeout(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Timeout {
            provider,
            message: message.into(),
        }
    }

    pub fn api_error(provider: &'static str, status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            provider,
            status,
            message: message.into(),
        }
    }

    pub fn provider_unavailable(provider: &'static str, message: impl Into<String>) -> Self {
        Self::ProviderUnavailable {
            provider,
            message: message.into(),
        }
    }

    pub fn context_length_exceeded(provider: &'static str, max: usize, actual: usize) -> Self {
        Self::ContextLengthExceeded {
            provider,
            max,
            actual,
        }
    }

    pub fn token_limit_exceeded(provider: &'static str, message: impl Into<String>) -> Self {
        Self::TokenLimitExceeded {
            provider,
            message: message.into(),
        }
    }

    pub fn response_parsing(provider: &'static str, message: impl Into<String>) -> Self {
        Self::ResponseParsing {
            provider,
            message: message.into(),
        }
    }

    pub fn cancelled(provider: &'static str, reason: impl Into<String>) -> Self {
        Self::Cancelled {
            provider,
            reason: reason.into(),
        }
    }

    pub fn other(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Other {
            provider,
            message: message.into(),
        }
    }

    /// Name of the provider that produced this error
    pub fn provider(&self) -> &'static str {
        match self {
            Self::RateLimit { provider, .. }
            | Self::Network { provider, .. }
            | Self::Timeout { provider, .. }
            | Self::ApiError { provider, .. }
            | Self::ProviderUnavailable { provider, .. }
            | Self::ContextLengthExceeded { provider, .. }
            | Self::TokenLimitExceeded { provider, .. }
            | Self::ResponseParsing { provider, .. }
            | Self::Cancelled { provider, .. }
            | Self::Other { provider, .. } => provider,
        }
    }

    /// The request was structurally too large for the endpoint.
    ///
    /// Resending the same request cannot succeed, so these are never retried.
    pub fn is_budget_exceeded(&self) -> bool {
        matches!(
            self,
            Self::ContextLengthExceeded { .. } | Self::TokenLimitExceeded { .. }
        )
    }

    /// Check if a fresh attempt of the same request may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ContextLengthExceeded { .. }
            | Self::TokenLimitExceeded { .. }
            | Self::Cancelled { .. } => false,

            Self::RateLimit { .. }
            | Self::Network { .. }
            | Self::Timeout { .. }
            | Self::ApiError { .. }
            | Self::ProviderUnavailable { .. }
            | Self::ResponseParsing { .. }
            | Self::Other { .. } => true,
        }
    }

    /// Minimum wait in seconds requested by the upstream, if any
    pub fn retry_delay(&self) -> Option<u64> {
        match self {
            Self::RateLimit { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// Get HTTP status code for this error
    pub fn http_status(&self) -> u16 {
        match self {
            Self::RateLimit { .. } => 429,
            Self::Network { .. } | Self::Timeout { .. } | Self::ProviderUnavailable { .. } => 503,
            Self::ApiError { status, .. } => *status,
            Self::ContextLengthExceeded { .. } | Self::TokenLimitExceeded { .. } => 413,
            Self::ResponseParsing { .. } => 502,
            Self::Cancelled { .. } => 499,
            Self::Other { .. } => 500,
        }
    }

    /// Stable machine-readable code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::RateLimit { .. } => "rate_limit",
            Self::Network { .. } => "network",
            Self::Timeout { .. } => "timeout",
            Self::ApiError { .. } => "api_error",
            Self::ProviderUnavailable { .. } => "provider_unavailable",
            Self::ContextLengthExceeded { .. } => "context_length_exceeded",
            Self::TokenLimitExceeded { .. } => "token_limit_exceeded",
            Self::ResponseParsing { .. } => "response_parsing",
            Self::Cancelled { .. } => "cancelled",
            Self::Other { .. } => "other",
        }
    }
}
