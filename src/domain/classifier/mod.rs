//! Local rule classifier.
//!
//! Maps flattened symptom text to a verdict using a fixed, ordered keyword
//! table. Pure and total: every input yields a verdict, unmatched text
//! falls through to the family medicine rule.

mod rules;

pub use rules::{Rule, Trigger, FALLBACK, RULES};

use crate::domain::triage::Verdict;

/// Returns the first rule matching `text`, or [`FALLBACK`].
pub fn matching_rule(text: &str) -> &'static Rule {
    let lower = text.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.trigger.matches(&lower))
        .unwrap_or(&FALLBACK)
}

/// Classifies flattened symptom text into a verdict.
pub fn classify(flat_text: &str) -> Verdict {
    let rule = matching_rule(flat_text);
    tracing::debug!(rule = rule.name, urgency = %rule.urgency, "Classified symptoms");
    Verdict::from_assessment(rule.assessment(), flat_text)
}
