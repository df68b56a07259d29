//! HTTP adapters - REST API implementations.
//!
//! The triage adapter owns the conversation endpoints; this module assembles
//! them with the health check and the shared tower layers.

pub mod triage;

use std::sync::Arc;

use axum::{routing::get, Router};
use ::http::HeaderValue;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::application::handlers::triage::TriageRegistry;
use crate::config::ServerConfig;

pub use triage::{triage_routes, TriageHandlers};

/// Builds the full application router.
///
/// Triage endpoints live under `/api/triage`; `/health` sits at the root so
/// load balancers can reach it without knowing the API prefix.
pub fn app_router(registry: Arc<TriageRegistry>, server: &ServerConfig) -> Router {
    let handlers = TriageHandlers::new(registry);

    Router::new()
        .route("/health", get(triage::health))
        .nest("/api/triage", triage_routes(handlers))
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(cors_layer(server))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        if server.is_production() {
            // No configured origins in production means same-origin only.
            return CorsLayer::new();
        }
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}
