//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the triage engine to the outside world:
//! - `step_provider` - Step provider implementations (local, remote, scripted)
//! - `http` - REST endpoints over the conversation registry

pub mod http;
pub mod step_provider;

pub use step_provider::{
    FailoverStepProvider, LocalRuleProvider, RemoteProviderConfig, RemoteStepProvider,
    ScriptedStepProvider,
};
