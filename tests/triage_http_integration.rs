//! Integration tests for triage HTTP endpoints.
//!
//! These tests drive the full router (routes, handlers, registry, controller)
//! with in-process step providers:
//! 1. Conversations walk from complaint to verdict over HTTP
//! 2. Domain errors map to the documented status codes
//! 3. The classifier endpoint and health check respond

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use symptom_triage::adapters::http::app_router;
use symptom_triage::adapters::step_provider::{LocalRuleProvider, ScriptedStepProvider};
use symptom_triage::application::TriageRegistry;
use symptom_triage::config::ServerConfig;
use symptom_triage::ports::{ProviderError, StepProvider};

// =============================================================================
// Test Infrastructure
// =============================================================================

fn app_with(provider: Arc<dyn StepProvider>) -> Router {
    let registry = Arc::new(TriageRegistry::new(provider));
    app_router(registry, &ServerConfig::default())
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn create_idle(app: &Router) -> String {
    let (status, body) = send(app, "POST", "/api/triage/conversations", Some(json!({}))).await;
    assert_eq!(status, StatusCode::CREATED);
    body["conversationId"].as_str().unwrap().to_string()
}

// =============================================================================
// Conversation flow
// =============================================================================

#[tokio::test]
async fn scripted_conversation_reaches_verdict() {
    let app = app_with(Arc::new(ScriptedStepProvider::demo()));

    let (status, view) = send(
        &app,
        "POST",
        "/api/triage/conversations",
        Some(json!({ "complaint": "I have had a cough and a fever" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(view["status"], "awaiting_answers");
    assert_eq!(view["stepTitle"], "Timing");
    assert_eq!(view["isFinal"], false);
    let id = view["conversationId"].as_str().unwrap().to_string();

    let (status, view) = send(
        &app,
        "POST",
        &format!("/api/triage/conversations/{id}/answers"),
        Some(json!({ "answers": { "onset": "three days ago", "pattern": "constant" } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["stepTitle"], "Severity");

    let (status, view) = send(
        &app,
        "POST",
        &format!("/api/triage/conversations/{id}/answers"),
        Some(json!({ "answers": { "severity": "6", "other": "tired" } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["status"], "terminal");
    assert_eq!(view["isFinal"], true);
    assert!(view["verdict"]["urgency"].is_string());
    assert!(view["verdict"]["symptoms"]
        .as_str()
        .unwrap()
        .contains("three days ago"));

    let (status, fetched) = send(&app, "GET", &format!("/api/triage/conversations/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, view);
}

#[tokio::test]
async fn local_provider_answers_immediately() {
    let app = app_with(Arc::new(LocalRuleProvider::new()));
    let id = create_idle(&app).await;

    let (status, view) = send(
        &app,
        "POST",
        &format!("/api/triage/conversations/{id}/start"),
        Some(json!({ "complaint": "Crushing chest pain and I can't breathe" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["isFinal"], true);
    assert_eq!(view["verdict"]["urgency"], "emergency");
}

#[tokio::test]
async fn restart_returns_to_idle_and_keeps_id() {
    let app = app_with(Arc::new(ScriptedStepProvider::demo()));
    let id = create_idle(&app).await;
    send(
        &app,
        "POST",
        &format!("/api/triage/conversations/{id}/start"),
        Some(json!({ "complaint": "My knee hurts when I walk" })),
    )
    .await;

    let (status, view) = send(&app, "POST", &format!("/api/triage/conversations/{id}/restart"), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["status"], "idle");
    assert_eq!(view["conversationId"], id.as_str());
    assert_eq!(view["transcriptLength"], 0);
}

#[tokio::test]
async fn provider_failure_then_retry() {
    let provider = ScriptedStepProvider::new().with_error(ProviderError::unavailable("down"));
    let app = app_with(Arc::new(provider));

    let (status, body) = send(
        &app,
        "POST",
        "/api/triage/conversations",
        Some(json!({ "complaint": "Itchy rash on my arm" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], "PROVIDER_ERROR");
    assert_eq!(body["details"]["retryable"], "true");
    let id = body["details"]["conversationId"].as_str().unwrap().to_string();

    let (status, view) = send(&app, "POST", &format!("/api/triage/conversations/{id}/retry"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["isFinal"], true);
    assert!(view.get("error").is_none());
}

#[tokio::test]
async fn delete_removes_conversation() {
    let app = app_with(Arc::new(LocalRuleProvider::new()));
    let id = create_idle(&app).await;

    let (status, _) = send(&app, "DELETE", &format!("/api/triage/conversations/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, "GET", &format!("/api/triage/conversations/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "CONVERSATION_NOT_FOUND");
}

// =============================================================================
// Error mapping
// =============================================================================

#[tokio::test]
async fn short_complaint_is_rejected() {
    let app = app_with(Arc::new(LocalRuleProvider::new()));
    let id = create_idle(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/triage/conversations/{id}/start"),
        Some(json!({ "complaint": "ow" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "TOO_SHORT");
}

#[tokio::test]
async fn malformed_id_is_bad_request() {
    let app = app_with(Arc::new(LocalRuleProvider::new()));

    let (status, body) = send(&app, "GET", "/api/triage/conversations/not-a-uuid", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn answers_without_session_conflict() {
    let app = app_with(Arc::new(LocalRuleProvider::new()));
    let id = create_idle(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/triage/conversations/{id}/answers"),
        Some(json!({ "answers": { "q": "a" } })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INVALID_STATE_TRANSITION");
}

#[tokio::test]
async fn missing_answer_is_rejected() {
    let app = app_with(Arc::new(ScriptedStepProvider::demo()));
    let id = create_idle(&app).await;
    send(
        &app,
        "POST",
        &format!("/api/triage/conversations/{id}/start"),
        Some(json!({ "complaint": "Headache since Monday" })),
    )
    .await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/triage/conversations/{id}/answers"),
        Some(json!({ "answers": { "onset": "monday", "pattern": "   " } })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "MISSING_ANSWER");
}

#[tokio::test]
async fn concurrent_start_is_busy() {
    let provider = ScriptedStepProvider::demo().with_delay(Duration::from_millis(200));
    let app = app_with(Arc::new(provider));
    let id = create_idle(&app).await;

    let first = {
        let app = app.clone();
        let uri = format!("/api/triage/conversations/{id}/start");
        tokio::spawn(async move {
            send(&app, "POST", &uri, Some(json!({ "complaint": "Sore throat and fever" }))).await
        })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/triage/conversations/{id}/start"),
        Some(json!({ "complaint": "Sore throat and fever" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "BUSY");

    let (status, _) = first.await.unwrap();
    assert_eq!(status, StatusCode::OK);
}

// =============================================================================
// Classifier and health
// =============================================================================

#[tokio::test]
async fn classify_reports_rule_and_verdict() {
    let app = app_with(Arc::new(LocalRuleProvider::new()));

    let (status, body) = send(
        &app,
        "POST",
        "/api/triage/classify",
        Some(json!({ "text": "Something feels off" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rule"], "fallback");
    assert_eq!(body["verdict"]["providerType"], "Family Medicine");
}

#[tokio::test]
async fn health_reports_ok() {
    let app = app_with(Arc::new(LocalRuleProvider::new()));

    let (status, body) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
