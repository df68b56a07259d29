//! Triage session errors.

use thiserror::Error;

use crate::domain::foundation::{ErrorCode, SessionId, ValidationError};

/// Errors raised by the session aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("A step request is already in progress")]
    Busy,

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Response for step {step} of session {session_id} no longer applies")]
    Superseded { session_id: SessionId, step: u32 },
}

impl SessionError {
    pub fn invalid_state(message: impl Into<String>) -> Self {
        SessionError::InvalidState(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            SessionError::Validation(err) => err.code(),
            SessionError::Busy => ErrorCode::Busy,
            SessionError::InvalidState(_) => ErrorCode::InvalidStateTransition,
            SessionError::Superseded { .. } => ErrorCode::Superseded,
        }
    }
}
