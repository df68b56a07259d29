//! Remote step provider - asks an HTTP inference service for the next step.
//!
//! # Wire format
//!
//! `POST {base_url}/v1/triage/step` with body
//! `{"step": 2, "transcript": [{"question": "...", "answer": "..."}]}`.
//!
//! The service answers with either a clarifying step
//! (`{"isFinal": false, "step": 2, "title": "...", "questions": [...]}`) or a
//! final assessment (`{"isFinal": true, "urgency": "doctor_visit", ...}`).
//!
//! # Configuration
//!
//! ```ignore
//! let config = RemoteProviderConfig::new("https://triage.internal")
//!     .with_api_key("secret")
//!     .with_timeout(Duration::from_secs(20));
//!
//! let provider = RemoteStepProvider::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::triage::{Assessment, QuestionSpec, Step, TranscriptEntry, Urgency};
use crate::ports::{ProviderError, StepOutcome, StepProvider, StepRequest};

/// Configuration for the remote provider.
#[derive(Debug, Clone)]
pub struct RemoteProviderConfig {
    /// Service root, without the `/v1/...` path.
    pub base_url: String,
    /// Optional bearer token.
    api_key: Option<Secret<String>>,
    /// Request timeout.
    pub timeout: Duration,
}

impl RemoteProviderConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(Secret::new(api_key.into()));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_ref().map(|key| key.expose_secret().as_str())
    }
}

/// HTTP-backed step provider.
pub struct RemoteStepProvider {
    config: RemoteProviderConfig,
    client: Client,
}

impl RemoteStepProvider {
    /// Creates a provider with its own HTTP client.
    ///
    /// # Errors
    ///
    /// - `Network` if the HTTP client cannot be built
    pub fn new(config: RemoteProviderConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn step_url(&self) -> String {
        format!("{}/v1/triage/step", self.config.base_url.trim_end_matches('/'))
    }

    async fn send_request(&self, request: &StepRequest) -> Result<Response, ProviderError> {
        let body = WireStepRequest {
            step: request.step,
            transcript: request.transcript.entries(),
        };

        let mut builder = self.client.post(self.step_url()).json(&body);
        if let Some(key) = self.config.api_key() {
            builder = builder.bearer_auth(key);
        }

        builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::timeout(self.config.timeout.as_secs())
            } else if e.is_connect() {
                ProviderError::network(format!("Connection failed: {}", e))
            } else {
                ProviderError::network(e.to_string())
            }
        })
    }

    async fn handle_response_status(response: Response) -> Result<Response, ProviderError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();
        Err(status_error(status, &error_body))
    }
}

/// Maps a non-success status to a provider error.
fn status_error(status: StatusCode, body: &str) -> ProviderError {
    match status.as_u16() {
        401 | 403 => ProviderError::AuthenticationFailed,
        429 => ProviderError::RateLimited,
        500..=599 => ProviderError::unavailable(format!("Server error {}: {}", status, body)),
        _ => ProviderError::invalid_response(format!("Unexpected status {}: {}", status, body)),
    }
}

#[async_trait]
impl StepProvider for RemoteStepProvider {
    async fn request_step(&self, request: StepRequest) -> Result<StepOutcome, ProviderError> {
        tracing::debug!(
            session_id = %request.session_id,
            step = request.step,
            url = %self.step_url(),
            "Requesting step from remote provider"
        );

        let response = self.send_request(&request).await?;
        let response = Self::handle_response_status(response).await?;

        let wire: WireStepResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::malformed(format!("Failed to parse response: {}", e)))?;

        wire.into_outcome(request.step)
    }

    fn provider_name(&self) -> &str {
        "remote"
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireStepRequest<'a> {
    step: u32,
    transcript: &'a [TranscriptEntry],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireStepResponse {
    #[serde(default)]
    is_final: bool,

    // Clarifying step
    step: Option<u32>,
    title: Option<String>,
    #[serde(default)]
    questions: Vec<QuestionSpec>,

    // Final assessment
    urgency: Option<Urgency>,
    condition: Option<String>,
    description: Option<String>,
    recommendation: Option<String>,
    provider_type: Option<String>,
    #[serde(default)]
    possible_conditions: Vec<String>,
    when_to_seek: Option<String>,
    confidence: Option<f64>,
    #[serde(default)]
    recommended_specialties: Vec<String>,
}

impl WireStepResponse {
    fn into_outcome(self, requested_step: u32) -> Result<StepOutcome, ProviderError> {
        if self.is_final {
            self.into_assessment().map(StepOutcome::Final)
        } else {
            self.into_step(requested_step).map(StepOutcome::Step)
        }
    }

    fn into_step(self, requested_step: u32) -> Result<Step, ProviderError> {
        let title = self
            .title
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ProviderError::malformed("step is missing a title"))?;

        let step = Step::new(self.step.unwrap_or(requested_step), title, self.questions);
        step.validate()
            .map_err(|e| ProviderError::malformed(e.to_string()))?;
        Ok(step)
    }

    fn into_assessment(self) -> Result<Assessment, ProviderError> {
        let urgency = self
            .urgency
            .ok_or_else(|| ProviderError::malformed("assessment is missing urgency"))?;
        let recommendation = self
            .recommendation
            .ok_or_else(|| ProviderError::malformed("assessment is missing recommendation"))?;
        let provider_type = self
            .provider_type
            .ok_or_else(|| ProviderError::malformed("assessment is missing providerType"))?;

        let condition = self
            .condition
            .or_else(|| self.possible_conditions.first().cloned())
            .unwrap_or_else(|| "Undetermined condition".to_string());

        Ok(Assessment {
            urgency,
            condition,
            description: self.description.unwrap_or_default(),
            recommendation,
            provider_type,
            possible_causes: self.possible_conditions,
            when_to_seek: self.when_to_seek,
            confidence: self.confidence,
            recommended_specialties: self.recommended_specialties,
        })
    }
}
