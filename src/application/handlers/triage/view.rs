//! Read model handed to the presentation layer.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ConversationId, SessionId};
use crate::domain::triage::{QuestionSpec, Session, SessionStatus, Verdict, STEP_COUNT_HINT};

/// Controller status as the presentation layer sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewStatus {
    /// No active session.
    Idle,
    Collecting,
    AwaitingAnswers,
    Terminal,
}

impl From<SessionStatus> for ViewStatus {
    fn from(status: SessionStatus) -> Self {
        match status {
            SessionStatus::Collecting => ViewStatus::Collecting,
            SessionStatus::AwaitingAnswers => ViewStatus::AwaitingAnswers,
            SessionStatus::Terminal => ViewStatus::Terminal,
        }
    }
}

/// Snapshot of one conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationView {
    pub conversation_id: ConversationId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
    pub step: u32,
    pub total_steps_hint: u32,
    pub status: ViewStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_title: Option<String>,
    pub questions: Vec<QuestionSpec>,
    pub is_final: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<Verdict>,
    pub busy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub transcript_length: usize,
}

impl ConversationView {
    pub(crate) fn build(
        conversation_id: ConversationId,
        session: Option<&Session>,
        error: Option<&str>,
    ) -> Self {
        let error = error.map(str::to_string);
        let Some(session) = session else {
            return Self {
                conversation_id,
                session_id: None,
                step: 0,
                total_steps_hint: STEP_COUNT_HINT,
                status: ViewStatus::Idle,
                step_title: None,
                questions: Vec::new(),
                is_final: false,
                verdict: None,
                busy: false,
                error,
                transcript_length: 0,
            };
        };

        let current_step = session.current_step();
        Self {
            conversation_id,
            session_id: Some(session.id()),
            step: session.step(),
            total_steps_hint: STEP_COUNT_HINT,
            status: session.status().into(),
            step_title: current_step.map(|s| s.title.clone()),
            questions: current_step.map(|s| s.questions.clone()).unwrap_or_default(),
            is_final: session.verdict().is_some(),
            verdict: session.verdict().cloned(),
            busy: session.is_busy(),
            error,
            transcript_length: session.transcript().len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::triage::{QuestionSpec, Step, StepOutcome};

    #[test]
    fn idle_view_is_empty() {
        let view = ConversationView::build(ConversationId::new(), None, Some("boom"));

        assert_eq!(view.status, ViewStatus::Idle);
        assert_eq!(view.total_steps_hint, 3);
        assert!(!view.busy);
        assert_eq!(view.error.as_deref(), Some("boom"));
    }

    #[test]
    fn awaiting_view_lists_questions() {
        let (mut session, request) = Session::open("runny nose and sneezing").unwrap();
        session
            .accept_outcome(
                request.tag(),
                StepOutcome::Step(Step::new(
                    1,
                    "Timing",
                    vec![QuestionSpec::new("onset", "When did it start?")],
                )),
            )
            .unwrap();

        let view = ConversationView::build(ConversationId::new(), Some(&session), None);

        assert_eq!(view.status, ViewStatus::AwaitingAnswers);
        assert_eq!(view.step, 1);
        assert_eq!(view.step_title.as_deref(), Some("Timing"));
        assert_eq!(view.questions.len(), 1);
        assert_eq!(view.transcript_length, 1);
        assert!(!view.busy);
    }

    #[test]
    fn serializes_camel_case_and_snake_case_status() {
        let (session, _) = Session::open("runny nose and sneezing").unwrap();
        let view = ConversationView::build(ConversationId::new(), Some(&session), None);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["status"], "collecting");
        assert_eq!(json["busy"], true);
        assert_eq!(json["totalStepsHint"], 3);
        assert!(json.get("verdict").is_none());
    }
}
