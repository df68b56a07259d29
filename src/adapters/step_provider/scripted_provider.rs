//! Scripted step provider for tests and demos.
//!
//! Replays a queue of outcomes and errors in order.
//!
//! # Features
//!
//! - Pre-configured steps, assessments and errors
//! - Simulated latency for busy and timeout testing
//! - Call tracking for verification
//!
//! Once the script is exhausted the provider answers like the local
//! classifier, so a demo dialogue always ends in a verdict.
//!
//! # Example
//!
//! ```ignore
//! let provider = ScriptedStepProvider::new()
//!     .with_step(Step::new(1, "Duration", vec![QuestionSpec::new("q1", "Since when?")]))
//!     .with_error(ProviderError::timeout(30))
//!     .with_delay(Duration::from_millis(100));
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::classifier;
use crate::domain::triage::{Assessment, QuestionSpec, Step};
use crate::ports::{ProviderError, StepOutcome, StepProvider, StepRequest};

/// Scripted step provider.
#[derive(Debug, Clone, Default)]
pub struct ScriptedStepProvider {
    /// Replies consumed in order.
    replies: Arc<Mutex<VecDeque<Result<StepOutcome, ProviderError>>>>,
    /// Simulated latency per request.
    delay: Duration,
    /// Call history for verification.
    calls: Arc<Mutex<Vec<StepRequest>>>,
}

impl ScriptedStepProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Two rounds of clarifying questions, then the classifier's verdict.
    pub fn demo() -> Self {
        Self::new()
            .with_step(Step::new(
                1,
                "Timing",
                vec![
                    QuestionSpec::new("onset", "When did the symptoms start?")
                        .with_placeholder("e.g. two days ago"),
                    QuestionSpec::new("pattern", "Are the symptoms constant or do they come and go?"),
                ],
            ))
            .with_step(Step::new(
                2,
                "Severity",
                vec![
                    QuestionSpec::new("severity", "How would you rate it from 1 to 10?")
                        .with_placeholder("1 - 10"),
                    QuestionSpec::new("other", "Have you noticed anything else?"),
                ],
            ))
    }

    /// Queues a clarifying step.
    pub fn with_step(self, step: Step) -> Self {
        self.push(Ok(StepOutcome::Step(step)));
        self
    }

    /// Queues a final assessment.
    pub fn with_assessment(self, assessment: Assessment) -> Self {
        self.push(Ok(StepOutcome::Final(assessment)));
        self
    }

    /// Queues an error.
    pub fn with_error(self, error: ProviderError) -> Self {
        self.push(Err(error));
        self
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns the number of calls made to this provider.
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Returns all recorded calls.
    pub fn calls(&self) -> Vec<StepRequest> {
        lock(&self.calls).clone()
    }

    /// Number of replies still queued.
    pub fn remaining(&self) -> usize {
        lock(&self.replies).len()
    }

    fn push(&self, reply: Result<StepOutcome, ProviderError>) {
        lock(&self.replies).push_back(reply);
    }

    fn next_reply(&self, request: &StepRequest) -> Result<StepOutcome, ProviderError> {
        lock(&self.replies).pop_front().unwrap_or_else(|| {
            let text = request.transcript.to_flat_text();
            Ok(StepOutcome::Final(classifier::matching_rule(&text).assessment()))
        })
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl StepProvider for ScriptedStepProvider {
    async fn request_step(&self, request: StepRequest) -> Result<StepOutcome, ProviderError> {
        lock(&self.calls).push(request.clone());

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        self.next_reply(&request)
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }
}
