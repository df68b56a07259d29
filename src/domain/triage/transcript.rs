//! Transcript store - the append-only question/answer log of a session.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// Separator placed between entries when the transcript is flattened.
pub const FLAT_TEXT_SEPARATOR: &str = " | ";

/// One question and the answer the user gave to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub question: String,
    pub answer: String,
}

impl TranscriptEntry {
    /// Renders the entry as `"<question>: <answer>"`.
    pub fn to_line(&self) -> String {
        format!("{}: {}", self.question, self.answer)
    }
}

/// Ordered, append-only log of question/answer pairs.
///
/// # Invariants
///
/// - Entries are never mutated or reordered once appended
/// - Every stored answer is non-empty after trimming
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    /// Creates an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry and returns the new length.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the answer is blank after trimming
    pub fn append(
        &mut self,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Result<usize, ValidationError> {
        let answer = answer.into();
        if answer.trim().is_empty() {
            return Err(ValidationError::empty_field("answer"));
        }

        self.entries.push(TranscriptEntry {
            question: question.into(),
            answer,
        });
        Ok(self.entries.len())
    }

    /// Joins every entry as `"<question>: <answer>"` with `" | "`.
    pub fn to_flat_text(&self) -> String {
        self.entries
            .iter()
            .map(TranscriptEntry::to_line)
            .collect::<Vec<_>>()
            .join(FLAT_TEXT_SEPARATOR)
    }

    /// Removes every entry. Safe to call on an empty transcript.
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    /// Returns the first entry, which holds the initial complaint.
    pub fn first(&self) -> Option<&TranscriptEntry> {
        self.entries.first()
    }
}
