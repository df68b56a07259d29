//! Clarifying questions, the steps that group them, and the answers to them.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::domain::foundation::ValidationError;

/// A single clarifying question presented to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSpec {
    /// Unique within its step.
    pub id: String,
    #[serde(alias = "question")]
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl QuestionSpec {
    pub fn new(id: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            placeholder: None,
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }
}

/// One round of clarifying questions.
///
/// Terminal results are not steps; they arrive as an assessment instead,
/// so every `Step` carries at least one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub step_number: u32,
    pub title: String,
    pub questions: Vec<QuestionSpec>,
}

impl Step {
    pub fn new(step_number: u32, title: impl Into<String>, questions: Vec<QuestionSpec>) -> Self {
        Self {
            step_number,
            title: title.into(),
            questions,
        }
    }

    /// Checks the structural rules a provider-supplied step must satisfy.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the step has no questions or a question lacks an id/prompt
    /// - `InvalidFormat` if two questions share an id
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.questions.is_empty() {
            return Err(ValidationError::empty_field("questions"));
        }

        let mut seen = HashSet::new();
        for question in &self.questions {
            if question.id.trim().is_empty() {
                return Err(ValidationError::empty_field("question.id"));
            }
            if question.prompt.trim().is_empty() {
                return Err(ValidationError::empty_field("question.prompt"));
            }
            if !seen.insert(question.id.as_str()) {
                return Err(ValidationError::invalid_format(
                    "question.id",
                    format!("duplicate question id '{}'", question.id),
                ));
            }
        }
        Ok(())
    }

    /// Returns the id of the first question without a usable answer.
    pub fn first_unanswered<'a>(&'a self, answers: &AnswerSet) -> Option<&'a str> {
        self.questions
            .iter()
            .find(|q| answers.answer_for(&q.id).is_none())
            .map(|q| q.id.as_str())
    }
}

/// Answers for the current step, keyed by question id.
///
/// Values are stored trimmed; blank values are dropped on insert.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet(HashMap<String, String>);

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an answer, replacing any previous one for the same question.
    pub fn insert(&mut self, question_id: impl Into<String>, answer: impl AsRef<str>) {
        let question_id = question_id.into();
        let trimmed = answer.as_ref().trim();
        if trimmed.is_empty() {
            self.0.remove(&question_id);
        } else {
            self.0.insert(question_id, trimmed.to_string());
        }
    }

    /// Builder form of [`AnswerSet::insert`].
    pub fn with_answer(mut self, question_id: impl Into<String>, answer: impl AsRef<str>) -> Self {
        self.insert(question_id, answer);
        self
    }

    pub fn answer_for(&self, question_id: &str) -> Option<&str> {
        self.0.get(question_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl<K: Into<String>, V: AsRef<str>> FromIterator<(K, V)> for AnswerSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut answers = AnswerSet::new();
        for (id, answer) in iter {
            answers.insert(id, answer);
        }
        answers
    }
}

impl From<HashMap<String, String>> for AnswerSet {
    fn from(map: HashMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_question_step() -> Step {
        Step::new(
            1,
            "About your symptoms",
            vec![
                QuestionSpec::new("duration", "How long have you had this?"),
                QuestionSpec::new("severity", "How severe is it?").with_placeholder("1-10"),
            ],
        )
    }

    mod answer_set {
        use super::*;

        #[test]
        fn trims_values() {
            let answers = AnswerSet::new().with_answer("duration", "  two days  ");
            assert_eq!(answers.answer_for("duration"), Some("two days"));
        }

        #[test]
        fn blank_value_is_not_an_answer() {
            let answers = AnswerSet::new().with_answer("duration", "   ");
            assert_eq!(answers.answer_for("duration"), None);
            assert!(answers.is_empty());
        }

        #[test]
        fn blank_value_removes_previous_answer() {
            let mut answers = AnswerSet::new().with_answer("duration", "a week");
            answers.insert("duration", "");
            assert_eq!(answers.answer_for("duration"), None);
        }

        #[test]
        fn deserializes_from_plain_map() {
            let answers: AnswerSet =
                serde_json::from_str(r#"{"duration": "2 days", "severity": "4"}"#).unwrap();
            assert_eq!(answers.len(), 2);
            assert_eq!(answers.answer_for("severity"), Some("4"));
        }
    }

    mod step_validation {
        use super::*;

        #[test]
        fn well_formed_step_passes() {
            assert!(two_question_step().validate().is_ok());
        }

        #[test]
        fn step_without_questions_is_rejected() {
            let step = Step::new(2, "Empty", vec![]);
            assert_eq!(step.validate(), Err(ValidationError::empty_field("questions")));
        }

        #[test]
        fn duplicate_ids_are_rejected() {
            let step = Step::new(
                1,
                "Dup",
                vec![QuestionSpec::new("a", "First?"), QuestionSpec::new("a", "Second?")],
            );
            assert!(matches!(
                step.validate(),
                Err(ValidationError::InvalidFormat { .. })
            ));
        }
    }

    #[test]
    fn first_unanswered_follows_question_order() {
        let step = two_question_step();
        let answers = AnswerSet::new().with_answer("severity", "7");
        assert_eq!(step.first_unanswered(&answers), Some("duration"));

        let answers = answers.with_answer("duration", "since Monday");
        assert_eq!(step.first_unanswered(&answers), None);
    }

    #[test]
    fn question_prompt_accepts_question_alias() {
        let spec: QuestionSpec =
            serde_json::from_str(r#"{"id": "q1", "question": "Any fever?"}"#).unwrap();
        assert_eq!(spec.prompt, "Any fever?");
        assert!(spec.placeholder.is_none());
    }
}
