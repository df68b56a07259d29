//! Triage Command and Query Handlers
//!
//! ## Commands
//! - `start_conversation` - Open a session from the initial complaint
//! - `submit_step_answers` - Answer the current step and request the next
//! - `retry_step` - Re-issue the request that failed last
//! - `restart` - Drop the session and return to idle
//!
//! ## Queries
//! - `view` - Snapshot of the conversation for the presentation layer

mod controller;
mod errors;
mod registry;
mod view;

pub use controller::{TriageController, DEFAULT_STEP_TIMEOUT};
pub use errors::{RegistryError, TriageError};
pub use registry::{TriageRegistry, DEFAULT_IDLE_TTL, DEFAULT_MAX_CONVERSATIONS};
pub use view::{ConversationView, ViewStatus};
