//! HTTP adapter for triage endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    ClassifyRequest, ClassifyResponse, CreateConversationRequest, ErrorResponse, HealthResponse,
    StartConversationRequest, SubmitAnswersRequest,
};
pub use handlers::{health, TriageHandlers};
pub use routes::triage_routes;
