//! Symptom triage HTTP server.

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::time::MissedTickBehavior;
use tracing::info;
use tracing_subscriber::EnvFilter;

use symptom_triage::adapters::http::app_router;
use symptom_triage::adapters::step_provider::{
    FailoverStepProvider, LocalRuleProvider, RemoteProviderConfig, RemoteStepProvider,
    ScriptedStepProvider,
};
use symptom_triage::application::TriageRegistry;
use symptom_triage::config::{AppConfig, LogFormat, ProviderKind, ServerConfig, TriageConfig};
use symptom_triage::ports::{ProviderError, StepProvider};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config.server);
    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = ?config.server.environment,
        "Starting symptom triage server"
    );

    let provider = build_provider(&config.triage)?;
    info!(provider = provider.provider_name(), "Step provider ready");

    let registry = Arc::new(
        TriageRegistry::new(provider)
            .with_step_timeout(config.triage.step_timeout())
            .with_max_conversations(config.triage.max_conversations)
            .with_idle_ttl(config.triage.idle_ttl()),
    );
    spawn_idle_sweeper(Arc::clone(&registry), config.triage.idle_ttl());

    let app = app_router(registry, &config.server);

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "Listening");

    axum::serve(listener, app).await?;
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    match server.effective_log_format() {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

/// Evicts abandoned conversations in the background.
fn spawn_idle_sweeper(registry: Arc<TriageRegistry>, idle_ttl: Duration) {
    let period = (idle_ttl / 4).max(Duration::from_secs(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            registry.sweep_idle().await;
        }
    });
}

fn build_provider(triage: &TriageConfig) -> Result<Arc<dyn StepProvider>, ProviderError> {
    match triage.provider {
        ProviderKind::Local => Ok(Arc::new(LocalRuleProvider::new())),
        ProviderKind::Scripted => Ok(Arc::new(ScriptedStepProvider::demo())),
        ProviderKind::Remote => {
            let url = triage.remote_url.clone().unwrap_or_default();
            let mut remote_config =
                RemoteProviderConfig::new(url).with_timeout(triage.remote_timeout());
            if let Some(api_key) = &triage.api_key {
                remote_config = remote_config.with_api_key(api_key.clone());
            }
            let remote: Arc<dyn StepProvider> = Arc::new(RemoteStepProvider::new(remote_config)?);

            if triage.fallback_to_local {
                Ok(Arc::new(
                    FailoverStepProvider::new(remote).with_fallback(Arc::new(LocalRuleProvider::new())),
                ))
            } else {
                Ok(remote)
            }
        }
    }
}
