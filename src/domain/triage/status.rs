//! Session lifecycle states and valid transitions.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// The lifecycle state of a triage session.
///
/// - `Collecting`: a step request is in flight; the session is busy
/// - `AwaitingAnswers`: a step is on screen, waiting for the user's answers
/// - `Terminal`: a verdict was produced; the session is closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Collecting,
    AwaitingAnswers,
    Terminal,
}

impl SessionStatus {
    /// Returns true while a step provider request is outstanding.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Collecting)
    }

    /// Returns true if the session can take answers for its current step.
    pub fn accepts_answers(&self) -> bool {
        matches!(self, Self::AwaitingAnswers)
    }
}

impl StateMachine for SessionStatus {
    fn successors(&self) -> &'static [Self] {
        use SessionStatus::*;
        match self {
            // Provider answered with another step or with a verdict
            Collecting => &[AwaitingAnswers, Terminal],
            // Answers submitted, next step requested
            AwaitingAnswers => &[Collecting],
            Terminal => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_to_snake_case() {
        let json = serde_json::to_string(&SessionStatus::AwaitingAnswers).unwrap();
        assert_eq!(json, "\"awaiting_answers\"");
    }

    #[test]
    fn only_collecting_is_busy() {
        assert!(SessionStatus::Collecting.is_busy());
        assert!(!SessionStatus::AwaitingAnswers.is_busy());
        assert!(!SessionStatus::Terminal.is_busy());
    }

    #[test]
    fn only_awaiting_answers_accepts_answers() {
        assert!(SessionStatus::AwaitingAnswers.accepts_answers());
        assert!(!SessionStatus::Collecting.accepts_answers());
        assert!(!SessionStatus::Terminal.accepts_answers());
    }

    #[test]
    fn terminal_is_absorbing() {
        assert!(SessionStatus::Terminal.is_terminal());
        assert!(SessionStatus::Terminal
            .transition_to(SessionStatus::Collecting)
            .is_err());
    }

    #[test]
    fn awaiting_answers_cannot_skip_to_terminal() {
        assert!(!SessionStatus::AwaitingAnswers.can_transition_to(&SessionStatus::Terminal));
    }

    #[test]
    fn collecting_resolves_either_way() {
        assert!(SessionStatus::Collecting.can_transition_to(&SessionStatus::AwaitingAnswers));
        assert!(SessionStatus::Collecting.can_transition_to(&SessionStatus::Terminal));
        assert!(!SessionStatus::Collecting.can_transition_to(&SessionStatus::Collecting));
    }
}
