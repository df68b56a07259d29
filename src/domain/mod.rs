//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machine)
//! - `triage` - Session lifecycle, transcript, steps and verdicts
//! - `classifier` - Keyword rule table mapping symptom text to a verdict

pub mod classifier;
pub mod foundation;
pub mod triage;
