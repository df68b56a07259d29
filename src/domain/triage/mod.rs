//! Triage domain module.
//!
//! Models one triage attempt: the append-only transcript, the clarifying
//! steps a provider hands out, the answers collected for them, and the
//! verdict that closes the session.

mod errors;
mod exchange;
mod question;
mod session;
mod status;
mod transcript;
mod verdict;

pub use errors::SessionError;
pub use exchange::{RequestTag, StepOutcome, StepRequest};
pub use question::{AnswerSet, QuestionSpec, Step};
pub use session::{
    validate_complaint, Session, CANONICAL_INITIAL_PROMPT, MIN_COMPLAINT_LENGTH,
    STEP_COUNT_HINT,
};
pub use status::SessionStatus;
pub use transcript::{Transcript, TranscriptEntry, FLAT_TEXT_SEPARATOR};
pub use verdict::{Assessment, Urgency, Verdict};
