//! HTTP DTOs for triage endpoints.
//!
//! Conversation responses reuse [`ConversationView`] as-is; it is already a
//! read model shaped for the presentation layer.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::triage::{AnswerSet, Verdict};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to open a conversation, optionally starting it right away.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateConversationRequest {
    #[serde(default)]
    pub complaint: Option<String>,
}

/// Request to start a fresh session.
#[derive(Debug, Clone, Deserialize)]
pub struct StartConversationRequest {
    pub complaint: String,
}

/// Answers for the current step, keyed by question id.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitAnswersRequest {
    pub answers: HashMap<String, String>,
}

impl SubmitAnswersRequest {
    pub fn into_answer_set(self) -> AnswerSet {
        AnswerSet::from(self.answers)
    }
}

/// Free text to run through the local classifier.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifyRequest {
    pub text: String,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Classifier output with the rule that fired.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyResponse {
    pub rule: String,
    pub verdict: Verdict,
}

/// Liveness check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message)
    }

    pub fn not_found(resource_type: &str, id: &str) -> Self {
        Self::new(
            ErrorCode::ConversationNotFound,
            format!("{} not found: {}", resource_type, id),
        )
    }

    /// Adds one detail entry, turning `details` into an object if needed.
    pub fn with_detail(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        let details = self
            .details
            .get_or_insert_with(|| serde_json::Value::Object(Default::default()));
        if let Some(map) = details.as_object_mut() {
            map.insert(key.to_string(), value.into());
        }
        self
    }
}

impl From<DomainError> for ErrorResponse {
    fn from(err: DomainError) -> Self {
        let details = (!err.details.is_empty()).then(|| {
            err.details
                .into_iter()
                .map(|(k, v)| (k, serde_json::Value::String(v)))
                .collect::<serde_json::Map<_, _>>()
                .into()
        });
        Self {
            code: err.code.to_string(),
            message: err.message,
            details,
        }
    }
}
