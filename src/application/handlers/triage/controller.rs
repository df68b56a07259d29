//! TriageController - drives one conversation through the triage dialogue.
//!
//! The controller owns at most one [`Session`] at a time. Every operation
//! takes the state lock, mutates the session, and releases the lock before
//! the step provider is awaited. When the provider answers, the lock is
//! taken again and the response is applied only if the session is still
//! waiting on the request's tag; anything else is discarded.
//!
//! The provider call and the resolution of its result run on a spawned
//! task. A caller that goes away mid-request (client disconnect, HTTP
//! timeout) therefore never leaves the session stuck in `Collecting`.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, MutexGuard};

use crate::domain::foundation::{ConversationId, Timestamp};
use crate::domain::triage::{AnswerSet, RequestTag, Session, SessionError};
use crate::ports::{ProviderError, StepOutcome, StepProvider, StepRequest};

use super::errors::TriageError;
use super::view::ConversationView;

/// Default bound on a single step provider call.
pub const DEFAULT_STEP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug)]
struct ControllerState {
    session: Option<Session>,
    /// Complaint of the latest start. Kept until its opening request
    /// succeeds so a failed start can be retried.
    draft_complaint: Option<String>,
    /// Last user-visible failure, cleared by the next successful operation.
    last_error: Option<String>,
    last_activity: Timestamp,
}

impl Default for ControllerState {
    fn default() -> Self {
        Self {
            session: None,
            draft_complaint: None,
            last_error: None,
            last_activity: Timestamp::now(),
        }
    }
}

/// Conversation controller for one interaction context.
pub struct TriageController {
    conversation_id: ConversationId,
    provider: Arc<dyn StepProvider>,
    step_timeout: Duration,
    state: Arc<Mutex<ControllerState>>,
}

impl fmt::Debug for TriageController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TriageController")
            .field("conversation_id", &self.conversation_id)
            .field("provider", &self.provider.provider_name())
            .field("step_timeout", &self.step_timeout)
            .finish_non_exhaustive()
    }
}

impl TriageController {
    pub fn new(provider: Arc<dyn StepProvider>) -> Self {
        Self::with_id(ConversationId::new(), provider)
    }

    pub fn with_id(conversation_id: ConversationId, provider: Arc<dyn StepProvider>) -> Self {
        Self {
            conversation_id,
            provider,
            step_timeout: DEFAULT_STEP_TIMEOUT,
            state: Arc::new(Mutex::new(ControllerState::default())),
        }
    }

    pub fn with_step_timeout(mut self, timeout: Duration) -> Self {
        self.step_timeout = timeout;
        self
    }

    pub fn conversation_id(&self) -> ConversationId {
        self.conversation_id
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Opens a fresh session for `complaint` and requests step 1.
    ///
    /// Any previous session that is not waiting on the provider is dropped.
    ///
    /// # Errors
    ///
    /// - `Busy` if a provider request is in flight
    /// - `Validation` if the trimmed complaint is too short
    /// - `Provider` if the opening request fails; the controller is idle again
    /// - `Superseded` if a restart happened while the request was in flight
    pub async fn start_conversation(&self, complaint: &str) -> Result<ConversationView, TriageError> {
        let request = {
            let mut guard = self.lock().await;
            let state: &mut ControllerState = &mut guard;
            if state.session.as_ref().is_some_and(Session::is_busy) {
                return Err(TriageError::Busy);
            }
            Self::open_session(state, complaint)?
        };

        tracing::info!(
            conversation_id = %self.conversation_id,
            session_id = %request.session_id,
            "Triage session opened"
        );

        self.dispatch(request).await
    }

    /// Submits answers for the current step and requests the next one.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if there is no session or it already has a verdict
    /// - `Busy` if a provider request is in flight
    /// - `Validation` if a question of the current step is unanswered
    /// - `Provider` if the request fails; the answers are kept for `retry_step`
    /// - `Superseded` if a restart happened while the request was in flight
    pub async fn submit_step_answers(
        &self,
        answers: AnswerSet,
    ) -> Result<ConversationView, TriageError> {
        let request = {
            let mut guard = self.lock().await;
            let state: &mut ControllerState = &mut guard;
            let session = state
                .session
                .as_mut()
                .ok_or_else(|| TriageError::invalid_state("no active session"))?;
            let result = session.submit_answers(answers);
            Self::record(state, result)?
        };

        self.dispatch(request).await
    }

    /// Re-issues the request that failed last, without re-entering input.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if nothing failed
    /// - otherwise as [`start_conversation`](Self::start_conversation) or
    ///   [`submit_step_answers`](Self::submit_step_answers)
    pub async fn retry_step(&self) -> Result<ConversationView, TriageError> {
        let request = {
            let mut guard = self.lock().await;
            let state: &mut ControllerState = &mut guard;
            let draft = state.draft_complaint.clone();
            match state.session.as_mut() {
                Some(session) => {
                    let result = session.retry();
                    Self::record(state, result)?
                }
                None => match draft {
                    Some(complaint) => Self::open_session(state, &complaint)?,
                    None => return Err(TriageError::invalid_state("nothing to retry")),
                },
            }
        };

        tracing::info!(
            conversation_id = %self.conversation_id,
            session_id = %request.session_id,
            step = request.step,
            "Retrying step request"
        );

        self.dispatch(request).await
    }

    /// Drops the session and returns to idle. Always succeeds.
    ///
    /// A provider response still in flight is discarded when it arrives.
    pub async fn restart(&self) -> ConversationView {
        let mut state = self.lock().await;
        if let Some(mut session) = state.session.take() {
            session.discard();
            tracing::info!(
                conversation_id = %self.conversation_id,
                session_id = %session.id(),
                "Triage session restarted"
            );
        }
        state.draft_complaint = None;
        state.last_error = None;
        ConversationView::build(self.conversation_id, None, None)
    }

    /// Current snapshot.
    pub async fn view(&self) -> ConversationView {
        let state = self.lock().await;
        snapshot(self.conversation_id, &state)
    }

    /// Time since the last operation, or `None` while a provider request is
    /// in flight.
    pub async fn idle_for(&self) -> Option<Duration> {
        let state = self.state.lock().await;
        if state.session.as_ref().is_some_and(Session::is_busy) {
            return None;
        }
        state.last_activity.age().to_std().ok()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Private helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Locks the state and marks the conversation as active.
    async fn lock(&self) -> MutexGuard<'_, ControllerState> {
        let mut state = self.state.lock().await;
        state.last_activity = Timestamp::now();
        state
    }

    fn open_session(state: &mut ControllerState, complaint: &str) -> Result<StepRequest, TriageError> {
        let (session, request) = Self::record(state, Session::open(complaint))?;
        if let Some(mut previous) = state.session.replace(session) {
            previous.discard();
        }
        state.draft_complaint = Some(complaint.to_string());
        state.last_error = None;
        Ok(request)
    }

    /// Converts a session result, remembering user-visible failures.
    fn record<T>(
        state: &mut ControllerState,
        result: Result<T, SessionError>,
    ) -> Result<T, TriageError> {
        result.map_err(|err| {
            let err = TriageError::from(err);
            if err.is_user_visible() {
                state.last_error = Some(err.to_string());
            }
            err
        })
    }

    async fn dispatch(&self, request: StepRequest) -> Result<ConversationView, TriageError> {
        let tag = request.tag();
        let conversation_id = self.conversation_id;
        let provider = Arc::clone(&self.provider);
        let state = Arc::clone(&self.state);
        let step_timeout = self.step_timeout;

        let task = tokio::spawn(async move {
            let call = {
                let provider = Arc::clone(&provider);
                tokio::spawn(async move { call_provider(provider.as_ref(), step_timeout, request).await })
            };
            // A panicking provider is settled as a failure.
            let result = call.await.unwrap_or_else(|join_error| {
                Err(ProviderError::unavailable(format!(
                    "step provider task failed: {}",
                    join_error
                )))
            });
            let mut state = state.lock().await;
            resolve(&mut state, conversation_id, provider.provider_name(), tag, result)?;
            Ok::<_, TriageError>(snapshot(conversation_id, &state))
        });

        match task.await {
            Ok(outcome) => outcome,
            Err(join_error) => Err(TriageError::Provider(ProviderError::unavailable(format!(
                "step provider task failed: {}",
                join_error
            )))),
        }
    }
}

fn snapshot(conversation_id: ConversationId, state: &ControllerState) -> ConversationView {
    ConversationView::build(
        conversation_id,
        state.session.as_ref(),
        state.last_error.as_deref(),
    )
}

/// Calls the provider under the step timeout and rejects malformed steps.
async fn call_provider(
    provider: &dyn StepProvider,
    step_timeout: Duration,
    request: StepRequest,
) -> Result<StepOutcome, ProviderError> {
    let outcome = tokio::time::timeout(step_timeout, provider.request_step(request))
        .await
        .map_err(|_| ProviderError::timeout(step_timeout.as_secs()))??;

    if let StepOutcome::Step(step) = &outcome {
        step.validate()
            .map_err(|e| ProviderError::malformed(e.to_string()))?;
    }
    Ok(outcome)
}

fn resolve(
    state: &mut ControllerState,
    conversation_id: ConversationId,
    provider_name: &str,
    tag: RequestTag,
    result: Result<StepOutcome, ProviderError>,
) -> Result<(), TriageError> {
    state.last_activity = Timestamp::now();
    let Some(session) = state.session.as_mut().filter(|s| s.is_waiting_on(&tag)) else {
        tracing::debug!(
            conversation_id = %conversation_id,
            session_id = %tag.session_id,
            step = tag.step,
            "Discarding response for superseded request"
        );
        return Err(TriageError::Superseded {
            session_id: tag.session_id,
            step: tag.step,
        });
    };

    match result {
        Ok(outcome) => {
            let is_final = outcome.is_final();
            session.accept_outcome(tag, outcome)?;
            tracing::info!(
                conversation_id = %conversation_id,
                session_id = %tag.session_id,
                step = tag.step,
                is_final,
                session_age_ms = session.created_at().age().num_milliseconds(),
                "Step provider answered"
            );
            state.draft_complaint = None;
            state.last_error = None;
            Ok(())
        }
        Err(err) => {
            tracing::warn!(
                conversation_id = %conversation_id,
                session_id = %tag.session_id,
                step = tag.step,
                provider = provider_name,
                error = %err,
                "Step provider request failed"
            );
            if session.current_step().is_some() {
                session.abandon_request(tag)?;
            } else {
                // Opening request: nothing to return to but idle.
                state.session = None;
            }
            let err = TriageError::Provider(err);
            state.last_error = Some(err.to_string());
            Err(err)
        }
    }
}
