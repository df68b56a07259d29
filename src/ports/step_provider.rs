//! Step Provider Port - decides the next clarifying step or the verdict.
//!
//! The controller hands a provider the transcript accumulated so far and the
//! number of the step it wants. The provider answers with either another
//! round of questions or a final assessment. Implementations can be local
//! (the rule classifier), remote (an HTTP inference service) or scripted.
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct AlwaysHomeCare;
//!
//! #[async_trait]
//! impl StepProvider for AlwaysHomeCare {
//!     async fn request_step(&self, request: StepRequest) -> Result<StepOutcome, ProviderError> {
//!         Ok(StepOutcome::Final(classify(&request.transcript.to_flat_text()).into()))
//!     }
//!
//!     fn provider_name(&self) -> &str {
//!         "always-home-care"
//!     }
//! }
//! ```

use async_trait::async_trait;

pub use crate::domain::triage::{StepOutcome, StepRequest};

/// Port for step providers.
#[async_trait]
pub trait StepProvider: Send + Sync {
    /// Returns the next step, or the final assessment, for `request`.
    async fn request_step(&self, request: StepRequest) -> Result<StepOutcome, ProviderError>;

    /// Short name used in logs.
    fn provider_name(&self) -> &str;
}

/// Step provider errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u64,
    },

    /// Provider is unavailable.
    #[error("provider unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// Rate limited by provider.
    #[error("rate limited by provider")]
    RateLimited,

    /// API key rejected.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Provider answered with an unexpected status.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Provider answered with a body that is not a usable step or verdict.
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl ProviderError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn timeout(timeout_secs: u64) -> Self {
        Self::Timeout { timeout_secs }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }

    /// Returns true if another provider might succeed where this one failed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ProviderError::Network(_)
                | ProviderError::Timeout { .. }
                | ProviderError::Unavailable { .. }
                | ProviderError::RateLimited
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classification() {
        assert!(ProviderError::network("connection reset").is_retryable());
        assert!(ProviderError::timeout(30).is_retryable());
        assert!(ProviderError::unavailable("503").is_retryable());
        assert!(ProviderError::RateLimited.is_retryable());

        assert!(!ProviderError::AuthenticationFailed.is_retryable());
        assert!(!ProviderError::invalid_response("418").is_retryable());
        assert!(!ProviderError::malformed("missing title").is_retryable());
    }

    #[test]
    fn timeout_message_includes_seconds() {
        assert_eq!(
            ProviderError::timeout(30).to_string(),
            "request timed out after 30s"
        );
    }

    #[test]
    fn provider_is_object_safe() {
        fn assert_object_safe(_: Option<&dyn StepProvider>) {}
        assert_object_safe(None);
    }
}
