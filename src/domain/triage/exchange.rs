//! Values exchanged between a session and its step provider.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::SessionId;

use super::question::Step;
use super::transcript::Transcript;
use super::verdict::Assessment;

/// Identifies which session and step an outstanding request was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestTag {
    pub session_id: SessionId,
    pub step: u32,
}

/// What a step provider is asked for: the next step given the transcript so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRequest {
    pub session_id: SessionId,
    /// The step number being requested, starting at 1.
    pub step: u32,
    pub transcript: Transcript,
}

impl StepRequest {
    pub fn tag(&self) -> RequestTag {
        RequestTag {
            session_id: self.session_id,
            step: self.step,
        }
    }
}

/// A step provider's answer.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// Another round of clarifying questions.
    Step(Step),
    /// The dialogue is over.
    Final(Assessment),
}

impl StepOutcome {
    pub fn is_final(&self) -> bool {
        matches!(self, StepOutcome::Final(_))
    }
}
