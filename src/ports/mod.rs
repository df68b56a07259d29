//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `StepProvider` - Produces the next clarifying step or the final assessment

mod step_provider;

pub use step_provider::{ProviderError, StepOutcome, StepProvider, StepRequest};
