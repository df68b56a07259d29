//! Errors surfaced by the triage controller and registry.

use thiserror::Error;

use crate::domain::foundation::{
    ConversationId, DomainError, ErrorCode, SessionId, ValidationError,
};
use crate::domain::triage::SessionError;
use crate::ports::ProviderError;

/// Errors returned by [`TriageController`](super::TriageController) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TriageError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("A step request is already in progress")]
    Busy,

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Step provider failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("Response for step {step} of session {session_id} no longer applies")]
    Superseded { session_id: SessionId, step: u32 },
}

impl TriageError {
    pub fn invalid_state(message: impl Into<String>) -> Self {
        TriageError::InvalidState(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            TriageError::Validation(err) => err.code(),
            TriageError::Busy => ErrorCode::Busy,
            TriageError::InvalidState(_) => ErrorCode::InvalidStateTransition,
            TriageError::Provider(ProviderError::Timeout { .. }) => ErrorCode::ProviderTimeout,
            TriageError::Provider(_) => ErrorCode::ProviderError,
            TriageError::Superseded { .. } => ErrorCode::Superseded,
        }
    }

    /// Message worth showing to the user in the conversation view.
    pub(crate) fn is_user_visible(&self) -> bool {
        matches!(self, TriageError::Validation(_) | TriageError::Provider(_))
    }
}

impl From<SessionError> for TriageError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Validation(err) => TriageError::Validation(err),
            SessionError::Busy => TriageError::Busy,
            SessionError::InvalidState(message) => TriageError::InvalidState(message),
            SessionError::Superseded { session_id, step } => {
                TriageError::Superseded { session_id, step }
            }
        }
    }
}

impl From<TriageError> for DomainError {
    fn from(err: TriageError) -> Self {
        match err {
            TriageError::Validation(inner) => DomainError::from(inner),
            TriageError::Provider(ref inner) => {
                let retryable = inner.is_retryable().to_string();
                DomainError::new(err.code(), err.to_string()).with_detail("retryable", retryable)
            }
            TriageError::Superseded { step, .. } => {
                DomainError::new(err.code(), err.to_string()).with_detail("step", step.to_string())
            }
            TriageError::Busy | TriageError::InvalidState(_) => {
                DomainError::new(err.code(), err.to_string())
            }
        }
    }
}

/// Errors returned by the [`TriageRegistry`](super::TriageRegistry).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Conversation not found: {0}")]
    NotFound(ConversationId),

    #[error("Conversation limit of {max} reached")]
    CapacityExceeded { max: usize },

    #[error(transparent)]
    Triage(#[from] TriageError),
}

impl RegistryError {
    pub fn code(&self) -> ErrorCode {
        match self {
            RegistryError::NotFound(_) => ErrorCode::ConversationNotFound,
            RegistryError::CapacityExceeded { .. } => ErrorCode::CapacityExceeded,
            RegistryError::Triage(err) => err.code(),
        }
    }
}
