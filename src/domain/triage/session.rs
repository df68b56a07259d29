//! Session aggregate - one triage attempt from complaint to verdict.
//!
//! The session never talks to a step provider itself. Each mutation that
//! needs the provider returns a [`StepRequest`]; the caller performs the
//! call and feeds the result back through [`Session::accept_outcome`] or
//! [`Session::abandon_request`]. The request tag is checked on the way back
//! so a response for a stale request cannot touch the session.

use crate::domain::foundation::{
    SessionId, StateMachine, Timestamp, ValidationError,
};

use super::errors::SessionError;
use super::exchange::{RequestTag, StepOutcome, StepRequest};
use super::question::{AnswerSet, Step};
use super::status::SessionStatus;
use super::transcript::Transcript;
use super::verdict::{Assessment, Verdict};

/// Question recorded as the first transcript entry of every session.
pub const CANONICAL_INITIAL_PROMPT: &str = "Describe your symptoms";

/// Minimum length of the trimmed initial complaint, in characters.
pub const MIN_COMPLAINT_LENGTH: usize = 5;

/// Number of clarifying steps the dialogue is designed around.
///
/// Presentation hint only. The provider decides when the dialogue ends.
pub const STEP_COUNT_HINT: u32 = 3;

/// A request that has been issued and not yet resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingRequest {
    tag: RequestTag,
    /// The transcript as it will read if the request succeeds.
    transcript: Transcript,
}

/// Session aggregate.
///
/// # Invariants
///
/// - The transcript only grows, and only when a provider request succeeds
/// - At most one request is pending; it exists exactly while `Collecting`
/// - `verdict` is set exactly when the status is `Terminal`
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    step: u32,
    status: SessionStatus,
    transcript: Transcript,
    current_step: Option<Step>,
    /// Answers submitted for the current step. Kept after a failed request
    /// so the same step can be retried without re-entering them.
    answers: AnswerSet,
    verdict: Option<Verdict>,
    pending: Option<PendingRequest>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Session {
    /// Opens a session for an initial complaint.
    ///
    /// Returns the session in `Collecting` together with the request for
    /// step 1.
    ///
    /// # Errors
    ///
    /// - `Validation` if the trimmed complaint is shorter than
    ///   [`MIN_COMPLAINT_LENGTH`]
    pub fn open(complaint: &str) -> Result<(Self, StepRequest), SessionError> {
        validate_complaint(complaint)?;

        let mut transcript = Transcript::new();
        transcript.append(CANONICAL_INITIAL_PROMPT, complaint)?;

        let now = Timestamp::now();
        let mut session = Self {
            id: SessionId::new(),
            step: 0,
            status: SessionStatus::Collecting,
            transcript: Transcript::new(),
            current_step: None,
            answers: AnswerSet::new(),
            verdict: None,
            pending: None,
            created_at: now,
            updated_at: now,
        };
        let request = session.issue(transcript);
        Ok((session, request))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Number of the step currently shown; 0 until the first step arrives.
    pub fn step(&self) -> u32 {
        self.step
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_busy(&self) -> bool {
        self.status.is_busy()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn current_step(&self) -> Option<&Step> {
        self.current_step.as_ref()
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn verdict(&self) -> Option<&Verdict> {
        self.verdict.as_ref()
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// Returns true if `tag` identifies the request this session is waiting on.
    pub fn is_waiting_on(&self, tag: &RequestTag) -> bool {
        self.pending.as_ref().is_some_and(|p| &p.tag == tag)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Submits answers for the current step and issues the next request.
    ///
    /// The transcript is untouched until the provider responds.
    ///
    /// # Errors
    ///
    /// - `Busy` if a request is already in flight
    /// - `InvalidState` if the session is terminal
    /// - `Validation` if any question of the current step is unanswered
    pub fn submit_answers(&mut self, answers: AnswerSet) -> Result<StepRequest, SessionError> {
        match self.status {
            SessionStatus::Collecting => return Err(SessionError::Busy),
            SessionStatus::Terminal => {
                return Err(SessionError::invalid_state("session already has a verdict"))
            }
            SessionStatus::AwaitingAnswers => {}
        }

        let step = self
            .current_step
            .as_ref()
            .ok_or_else(|| SessionError::invalid_state("no step is awaiting answers"))?;

        if let Some(missing) = step.first_unanswered(&answers) {
            return Err(ValidationError::missing_answer(missing).into());
        }

        let mut transcript = self.transcript.clone();
        for question in &step.questions {
            let answer = answers
                .answer_for(&question.id)
                .ok_or_else(|| ValidationError::missing_answer(&question.id))?;
            transcript.append(question.prompt.clone(), answer)?;
        }

        self.status = self.status.transition_to(SessionStatus::Collecting)?;
        self.answers = answers;
        Ok(self.issue(transcript))
    }

    /// Re-submits the answers kept from a failed request.
    ///
    /// # Errors
    ///
    /// Same as [`Session::submit_answers`], plus `InvalidState` when there
    /// is nothing to retry.
    pub fn retry(&mut self) -> Result<StepRequest, SessionError> {
        if self.status.accepts_answers() && self.answers.is_empty() {
            return Err(SessionError::invalid_state("no failed request to retry"));
        }
        let answers = self.answers.clone();
        self.submit_answers(answers)
    }

    /// Applies a provider outcome to the request identified by `tag`.
    ///
    /// A step moves the session to `AwaitingAnswers` with the step number
    /// incremented; an assessment produces the verdict and closes it.
    ///
    /// # Errors
    ///
    /// - `Superseded` if the session is not waiting on `tag`
    pub fn accept_outcome(
        &mut self,
        tag: RequestTag,
        outcome: StepOutcome,
    ) -> Result<(), SessionError> {
        match outcome {
            StepOutcome::Step(step) => self.accept_step(tag, step),
            StepOutcome::Final(assessment) => self.accept_assessment(tag, assessment),
        }
    }

    /// Drops the pending request after a provider failure.
    ///
    /// The session returns to the step it was on with the submitted answers
    /// kept for a retry.
    ///
    /// # Errors
    ///
    /// - `Superseded` if the session is not waiting on `tag`
    /// - `InvalidState` for the opening request, which has no step to return to
    pub fn abandon_request(&mut self, tag: RequestTag) -> Result<(), SessionError> {
        self.ensure_waiting_on(&tag)?;
        if self.current_step.is_none() {
            return Err(SessionError::invalid_state(
                "opening request failed; the session has no step to return to",
            ));
        }

        self.status = self.status.transition_to(SessionStatus::AwaitingAnswers)?;
        self.pending = None;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Clears the transcript, answers and any pending request.
    ///
    /// Used when the user restarts; the session is dropped afterwards.
    pub fn discard(&mut self) {
        self.transcript.reset();
        self.answers.clear();
        self.pending = None;
        self.updated_at = Timestamp::now();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Private helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn issue(&mut self, transcript: Transcript) -> StepRequest {
        let request = StepRequest {
            session_id: self.id,
            step: self.step + 1,
            transcript: transcript.clone(),
        };
        self.pending = Some(PendingRequest {
            tag: request.tag(),
            transcript,
        });
        self.updated_at = Timestamp::now();
        request
    }

    fn accept_step(&mut self, tag: RequestTag, step: Step) -> Result<(), SessionError> {
        let pending = self.take_pending(&tag)?;
        self.status = self.status.transition_to(SessionStatus::AwaitingAnswers)?;
        self.transcript = pending.transcript;
        self.step = tag.step;
        self.current_step = Some(step);
        self.answers.clear();
        self.updated_at = Timestamp::now();
        Ok(())
    }

    fn accept_assessment(
        &mut self,
        tag: RequestTag,
        assessment: Assessment,
    ) -> Result<(), SessionError> {
        let pending = self.take_pending(&tag)?;
        self.status = self.status.transition_to(SessionStatus::Terminal)?;
        self.transcript = pending.transcript;
        self.verdict = Some(Verdict::from_assessment(
            assessment,
            self.transcript.to_flat_text(),
        ));
        self.current_step = None;
        self.answers.clear();
        self.updated_at = Timestamp::now();
        Ok(())
    }

    fn ensure_waiting_on(&self, tag: &RequestTag) -> Result<(), SessionError> {
        if self.is_waiting_on(tag) {
            Ok(())
        } else {
            Err(SessionError::Superseded {
                session_id: tag.session_id,
                step: tag.step,
            })
        }
    }

    fn take_pending(&mut self, tag: &RequestTag) -> Result<PendingRequest, SessionError> {
        self.ensure_waiting_on(tag)?;
        self.pending.take().ok_or(SessionError::Superseded {
            session_id: tag.session_id,
            step: tag.step,
        })
    }
}

/// Checks the initial complaint against the minimum length rule.
pub fn validate_complaint(complaint: &str) -> Result<(), ValidationError> {
    let length = complaint.trim().chars().count();
    if length < MIN_COMPLAINT_LENGTH {
        return Err(ValidationError::too_short(
            "complaint",
            MIN_COMPLAINT_LENGTH,
            length,
        ));
    }
    Ok(())
}
