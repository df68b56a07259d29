//! Failover step provider.
//!
//! When the primary provider fails with a transient error (network, timeout,
//! unavailable, rate limited), the request is repeated against the fallback
//! if one is configured.
//!
//! # Example
//!
//! ```ignore
//! let provider = FailoverStepProvider::new(Arc::new(RemoteStepProvider::new(config)?))
//!     .with_fallback(Arc::new(LocalRuleProvider::new()));
//! ```

use async_trait::async_trait;
use std::sync::Arc;

use crate::ports::{ProviderError, StepOutcome, StepProvider, StepRequest};

/// Step provider wrapper with failover support.
pub struct FailoverStepProvider {
    primary: Arc<dyn StepProvider>,
    fallback: Option<Arc<dyn StepProvider>>,
}

impl FailoverStepProvider {
    /// Creates a failover provider with only a primary provider.
    pub fn new(primary: Arc<dyn StepProvider>) -> Self {
        Self {
            primary,
            fallback: None,
        }
    }

    /// Adds a fallback provider.
    pub fn with_fallback(mut self, fallback: Arc<dyn StepProvider>) -> Self {
        self.fallback = Some(fallback);
        self
    }
}

#[async_trait]
impl StepProvider for FailoverStepProvider {
    async fn request_step(&self, request: StepRequest) -> Result<StepOutcome, ProviderError> {
        match self.primary.request_step(request.clone()).await {
            Ok(outcome) => Ok(outcome),
            Err(err) if err.is_retryable() => match &self.fallback {
                Some(fallback) => {
                    tracing::warn!(
                        session_id = %request.session_id,
                        step = request.step,
                        primary = self.primary.provider_name(),
                        fallback = fallback.provider_name(),
                        error = %err,
                        "Primary step provider failed, using fallback"
                    );
                    fallback.request_step(request).await
                }
                None => Err(err),
            },
            Err(err) => Err(err),
        }
    }

    fn provider_name(&self) -> &str {
        self.primary.provider_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::step_provider::{LocalRuleProvider, ScriptedStepProvider};
    use crate::domain::foundation::SessionId;
    use crate::domain::triage::{QuestionSpec, Step, Transcript};

    fn request() -> StepRequest {
        let mut transcript = Transcript::new();
        transcript.append("Describe your symptoms", "itchy rash").unwrap();
        StepRequest {
            session_id: SessionId::new(),
            step: 1,
            transcript,
        }
    }

    fn step_one() -> Step {
        Step::new(1, "Details", vec![QuestionSpec::new("where", "Where is it?")])
    }

    #[tokio::test]
    async fn primary_success_skips_fallback() {
        let primary = ScriptedStepProvider::new().with_step(step_one());
        let fallback = ScriptedStepProvider::new();
        let provider = FailoverStepProvider::new(Arc::new(primary))
            .with_fallback(Arc::new(fallback.clone()));

        let outcome = provider.request_step(request()).await.unwrap();

        assert_eq!(outcome, StepOutcome::Step(step_one()));
        assert_eq!(fallback.call_count(), 0);
    }

    #[tokio::test]
    async fn retryable_error_uses_fallback() {
        let primary = ScriptedStepProvider::new().with_error(ProviderError::unavailable("503"));
        let provider = FailoverStepProvider::new(Arc::new(primary))
            .with_fallback(Arc::new(LocalRuleProvider::new()));

        let outcome = provider.request_step(request()).await.unwrap();
        assert!(outcome.is_final());
    }

    #[tokio::test]
    async fn non_retryable_error_is_returned() {
        let primary = ScriptedStepProvider::new().with_error(ProviderError::AuthenticationFailed);
        let fallback = ScriptedStepProvider::new();
        let provider = FailoverStepProvider::new(Arc::new(primary))
            .with_fallback(Arc::new(fallback.clone()));

        let err = provider.request_step(request()).await.unwrap_err();

        assert_eq!(err, ProviderError::AuthenticationFailed);
        assert_eq!(fallback.call_count(), 0);
    }

    #[tokio::test]
    async fn without_fallback_error_is_returned() {
        let primary = ScriptedStepProvider::new().with_error(ProviderError::timeout(5));
        let provider = FailoverStepProvider::new(Arc::new(primary));

        assert_eq!(
            provider.request_step(request()).await.unwrap_err(),
            ProviderError::timeout(5)
        );
    }

    #[test]
    fn reports_primary_name() {
        let provider = FailoverStepProvider::new(Arc::new(ScriptedStepProvider::new()))
            .with_fallback(Arc::new(LocalRuleProvider::new()));
        assert_eq!(provider.provider_name(), "scripted");
    }
}
