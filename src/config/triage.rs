//! Triage engine configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Triage engine configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TriageConfig {
    /// Which step provider answers the controllers
    #[serde(default)]
    pub provider: ProviderKind,

    /// Base URL of the remote step service
    pub remote_url: Option<String>,

    /// Bearer token for the remote step service
    pub api_key: Option<String>,

    /// Bound on a single step provider call, in seconds
    #[serde(default = "default_step_timeout")]
    pub step_timeout_secs: u64,

    /// Fall back to the local classifier when the remote service is unreachable
    #[serde(default = "default_fallback_to_local")]
    pub fallback_to_local: bool,

    /// Upper bound on open conversations
    #[serde(default = "default_max_conversations")]
    pub max_conversations: usize,

    /// Seconds a conversation may sit untouched before it can be evicted
    #[serde(default = "default_idle_ttl")]
    pub idle_ttl_secs: u64,
}

/// Headroom left between the remote client's own deadline and the step
/// timeout, so a remote timeout surfaces as a provider error the failover
/// can act on.
const REMOTE_TIMEOUT_MARGIN: Duration = Duration::from_secs(2);

/// Step provider selection
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Keyword classifier, verdict on the first request
    #[default]
    Local,
    /// HTTP step service
    Remote,
    /// Built-in demo script followed by the classifier
    Scripted,
}

impl TriageConfig {
    /// Step timeout as Duration
    pub fn step_timeout(&self) -> Duration {
        Duration::from_secs(self.step_timeout_secs)
    }

    /// Deadline for the remote HTTP client, strictly shorter than the step timeout
    pub fn remote_timeout(&self) -> Duration {
        let step = self.step_timeout();
        step.saturating_sub(REMOTE_TIMEOUT_MARGIN).max(step / 2)
    }

    /// Idle TTL as Duration
    pub fn idle_ttl(&self) -> Duration {
        Duration::from_secs(self.idle_ttl_secs)
    }

    /// Check if a remote URL is configured
    pub fn has_remote_url(&self) -> bool {
        self.remote_url.as_ref().is_some_and(|u| !u.trim().is_empty())
    }

    /// Validate triage configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.step_timeout_secs == 0 || self.step_timeout_secs > 300 {
            return Err(ValidationError::InvalidStepTimeout);
        }
        if self.max_conversations == 0 {
            return Err(ValidationError::InvalidMaxConversations);
        }
        if self.idle_ttl_secs == 0 {
            return Err(ValidationError::InvalidIdleTtl);
        }

        if self.provider == ProviderKind::Remote {
            let url = self
                .remote_url
                .as_deref()
                .filter(|u| !u.trim().is_empty())
                .ok_or(ValidationError::MissingRequired("TRIAGE__REMOTE_URL"))?;
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ValidationError::InvalidRemoteUrl);
            }
        }

        Ok(())
    }
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            remote_url: None,
            api_key: None,
            step_timeout_secs: default_step_timeout(),
            fallback_to_local: default_fallback_to_local(),
            max_conversations: default_max_conversations(),
            idle_ttl_secs: default_idle_ttl(),
        }
    }
}

fn default_step_timeout() -> u64 {
    30
}

fn default_fallback_to_local() -> bool {
    true
}

fn default_max_conversations() -> usize {
    1000
}

fn default_idle_ttl() -> u64 {
    30 * 60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triage_config_defaults() {
        let config = TriageConfig::default();
        assert_eq!(config.provider, ProviderKind::Local);
        assert_eq!(config.step_timeout(), Duration::from_secs(30));
        assert!(config.fallback_to_local);
        assert_eq!(config.max_conversations, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_remote_timeout_is_shorter_than_step_timeout() {
        let config = TriageConfig::default();
        assert_eq!(config.remote_timeout(), Duration::from_secs(28));

        for secs in [1, 2, 3, 300] {
            let config = TriageConfig {
                step_timeout_secs: secs,
                ..Default::default()
            };
            assert!(config.remote_timeout() < config.step_timeout());
            assert!(!config.remote_timeout().is_zero());
        }
    }

    #[test]
    fn test_zero_idle_ttl_is_rejected() {
        let config = TriageConfig {
            idle_ttl_secs: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidIdleTtl)
        ));
        assert_eq!(TriageConfig::default().idle_ttl(), Duration::from_secs(1800));
    }

    #[test]
    fn test_remote_requires_url() {
        let config = TriageConfig {
            provider: ProviderKind::Remote,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingRequired(_))
        ));
    }

    #[test]
    fn test_remote_url_must_be_http() {
        let config = TriageConfig {
            provider: ProviderKind::Remote,
            remote_url: Some("ftp://triage.local".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidRemoteUrl)
        ));

        let config = TriageConfig {
            remote_url: Some("https://triage.local".to_string()),
            ..config
        };
        assert!(config.validate().is_ok());
        assert!(config.has_remote_url());
    }

    #[test]
    fn test_validation_invalid_limits() {
        let config = TriageConfig {
            step_timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = TriageConfig {
            max_conversations: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
