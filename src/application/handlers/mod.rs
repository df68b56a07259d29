//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod triage;

pub use triage::{
    ConversationView, RegistryError, TriageController, TriageError, TriageRegistry, ViewStatus,
};
