//! HTTP routes for triage endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    classify, create_conversation, delete_conversation, get_conversation, restart, retry_step,
    start_conversation, submit_answers, TriageHandlers,
};

/// Creates the triage router with all endpoints.
pub fn triage_routes(handlers: TriageHandlers) -> Router {
    Router::new()
        .route("/conversations", post(create_conversation))
        .route(
            "/conversations/:id",
            get(get_conversation).delete(delete_conversation),
        )
        .route("/conversations/:id/start", post(start_conversation))
        .route("/conversations/:id/answers", post(submit_answers))
        .route("/conversations/:id/retry", post(retry_step))
        .route("/conversations/:id/restart", post(restart))
        .route("/classify", post(classify))
        .with_state(handlers)
}
