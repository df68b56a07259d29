//! Local rule provider - answers every request with the keyword classifier.

use async_trait::async_trait;

use crate::domain::classifier;
use crate::ports::{ProviderError, StepOutcome, StepProvider, StepRequest};

/// Step provider backed by the local rule classifier.
///
/// Never asks clarifying questions: the first request already yields the
/// final assessment for the flattened transcript.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalRuleProvider;

impl LocalRuleProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl StepProvider for LocalRuleProvider {
    async fn request_step(&self, request: StepRequest) -> Result<StepOutcome, ProviderError> {
        let text = request.transcript.to_flat_text();
        let rule = classifier::matching_rule(&text);

        tracing::debug!(
            session_id = %request.session_id,
            step = request.step,
            rule = rule.name,
            "Local classifier produced assessment"
        );

        Ok(StepOutcome::Final(rule.assessment()))
    }

    fn provider_name(&self) -> &str {
        "local-rules"
    }
}
