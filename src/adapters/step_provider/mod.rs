//! Step Provider Adapters.
//!
//! Implementations of the StepProvider port.
//!
//! ## Available Adapters
//!
//! - `LocalRuleProvider` - Keyword classifier, answers with a verdict immediately
//! - `RemoteStepProvider` - HTTP inference service
//! - `FailoverStepProvider` - Wrapper falling back to a second provider on transient errors
//! - `ScriptedStepProvider` - Replays a fixed script, for tests and demos

mod failover_provider;
mod local_rule_provider;
mod remote_provider;
mod scripted_provider;

pub use failover_provider::FailoverStepProvider;
pub use local_rule_provider::LocalRuleProvider;
pub use remote_provider::{RemoteProviderConfig, RemoteStepProvider};
pub use scripted_provider::ScriptedStepProvider;
