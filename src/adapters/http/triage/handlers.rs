//! HTTP handlers for triage endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::handlers::triage::{
    RegistryError, TriageController, TriageError, TriageRegistry,
};
use crate::domain::classifier;
use crate::domain::foundation::{ConversationId, DomainError};

use super::dto::{
    ClassifyRequest, ClassifyResponse, CreateConversationRequest, ErrorResponse, HealthResponse,
    StartConversationRequest, SubmitAnswersRequest,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct TriageHandlers {
    registry: Arc<TriageRegistry>,
}

impl TriageHandlers {
    pub fn new(registry: Arc<TriageRegistry>) -> Self {
        Self { registry }
    }

    async fn controller(&self, id: &str) -> Result<Arc<TriageController>, Response> {
        let id = id.parse::<ConversationId>().map_err(|_| {
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request("Invalid conversation ID")),
            )
                .into_response()
        })?;
        self.registry.get(id).await.map_err(handle_registry_error)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/triage/conversations - Open a conversation
pub async fn create_conversation(
    State(handlers): State<TriageHandlers>,
    body: Option<Json<CreateConversationRequest>>,
) -> Response {
    let req = body.map(|Json(req)| req).unwrap_or_default();

    let controller = match handlers.registry.create().await {
        Ok(controller) => controller,
        Err(e) => return handle_registry_error(e),
    };

    let Some(complaint) = req.complaint else {
        return (StatusCode::CREATED, Json(controller.view().await)).into_response();
    };

    match controller.start_conversation(&complaint).await {
        Ok(view) => (StatusCode::CREATED, Json(view)).into_response(),
        Err(e) => {
            let (status, body) = triage_error_body(e);
            let body = body.with_detail("conversationId", controller.conversation_id().to_string());
            (status, Json(body)).into_response()
        }
    }
}

/// GET /api/triage/conversations/:id - Current conversation view
pub async fn get_conversation(
    State(handlers): State<TriageHandlers>,
    Path(id): Path<String>,
) -> Response {
    match handlers.controller(&id).await {
        Ok(controller) => (StatusCode::OK, Json(controller.view().await)).into_response(),
        Err(response) => response,
    }
}

/// DELETE /api/triage/conversations/:id - Close a conversation
pub async fn delete_conversation(
    State(handlers): State<TriageHandlers>,
    Path(id): Path<String>,
) -> Response {
    let controller = match handlers.controller(&id).await {
        Ok(controller) => controller,
        Err(response) => return response,
    };

    match handlers.registry.remove(controller.conversation_id()).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => handle_registry_error(e),
    }
}

/// POST /api/triage/conversations/:id/start - Start a fresh session
pub async fn start_conversation(
    State(handlers): State<TriageHandlers>,
    Path(id): Path<String>,
    Json(req): Json<StartConversationRequest>,
) -> Response {
    let controller = match handlers.controller(&id).await {
        Ok(controller) => controller,
        Err(response) => return response,
    };

    match controller.start_conversation(&req.complaint).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => handle_triage_error(e),
    }
}

/// POST /api/triage/conversations/:id/answers - Answer the current step
pub async fn submit_answers(
    State(handlers): State<TriageHandlers>,
    Path(id): Path<String>,
    Json(req): Json<SubmitAnswersRequest>,
) -> Response {
    let controller = match handlers.controller(&id).await {
        Ok(controller) => controller,
        Err(response) => return response,
    };

    match controller.submit_step_answers(req.into_answer_set()).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => handle_triage_error(e),
    }
}

/// POST /api/triage/conversations/:id/retry - Retry the failed request
pub async fn retry_step(
    State(handlers): State<TriageHandlers>,
    Path(id): Path<String>,
) -> Response {
    let controller = match handlers.controller(&id).await {
        Ok(controller) => controller,
        Err(response) => return response,
    };

    match controller.retry_step().await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => handle_triage_error(e),
    }
}

/// POST /api/triage/conversations/:id/restart - Back to idle
pub async fn restart(State(handlers): State<TriageHandlers>, Path(id): Path<String>) -> Response {
    match handlers.controller(&id).await {
        Ok(controller) => (StatusCode::OK, Json(controller.restart().await)).into_response(),
        Err(response) => response,
    }
}

/// POST /api/triage/classify - Run text through the local classifier
pub async fn classify(Json(req): Json<ClassifyRequest>) -> Response {
    let rule = classifier::matching_rule(&req.text);
    let response = ClassifyResponse {
        rule: rule.name.to_string(),
        verdict: classifier::classify(&req.text),
    };
    (StatusCode::OK, Json(response)).into_response()
}

/// GET /health - Liveness check
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn triage_status(error: &TriageError) -> StatusCode {
    match error {
        TriageError::Validation(_) => StatusCode::BAD_REQUEST,
        TriageError::Busy | TriageError::InvalidState(_) | TriageError::Superseded { .. } => {
            StatusCode::CONFLICT
        }
        TriageError::Provider(_) => StatusCode::BAD_GATEWAY,
    }
}

fn triage_error_body(error: TriageError) -> (StatusCode, ErrorResponse) {
    let status = triage_status(&error);
    (status, ErrorResponse::from(DomainError::from(error)))
}

fn handle_triage_error(error: TriageError) -> Response {
    let (status, body) = triage_error_body(error);
    (status, Json(body)).into_response()
}

fn handle_registry_error(error: RegistryError) -> Response {
    match error {
        RegistryError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found("Conversation", &id.to_string())),
        )
            .into_response(),
        RegistryError::CapacityExceeded { .. } => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse::new(error.code(), error.to_string())),
        )
            .into_response(),
        RegistryError::Triage(e) => handle_triage_error(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{SessionId, ValidationError};
    use crate::ports::ProviderError;

    #[test]
    fn validation_maps_to_400() {
        let error = TriageError::Validation(ValidationError::too_short("complaint", 5, 2));
        assert_eq!(handle_triage_error(error).status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn busy_and_state_conflicts_map_to_409() {
        assert_eq!(
            handle_triage_error(TriageError::Busy).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            handle_triage_error(TriageError::invalid_state("terminal")).status(),
            StatusCode::CONFLICT
        );
        let superseded = TriageError::Superseded {
            session_id: SessionId::new(),
            step: 2,
        };
        assert_eq!(handle_triage_error(superseded).status(), StatusCode::CONFLICT);
    }

    #[test]
    fn provider_failure_maps_to_502() {
        let error = TriageError::Provider(ProviderError::RateLimited);
        assert_eq!(handle_triage_error(error).status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn registry_errors_map_to_404_and_503() {
        assert_eq!(
            handle_registry_error(RegistryError::NotFound(ConversationId::new())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            handle_registry_error(RegistryError::CapacityExceeded { max: 1 }).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
