//! Question value objects
//!
//! A [`Question`] is one entry of a form's question set, as produced by
//! question extraction and stored as a JSON artifact. Ordering by `id`
//! is the canonical order of the form.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// A single form question (Value Object)
///
/// Immutable once loaded. The `text` field is serialized as `question`
/// to match the stored artifact shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: u32,
    pub section: String,
    #[serde(rename = "question")]
    pub text: String,
}

impl Question {
    /// Create a new question
    ///
    /// # Panics
    /// Panics if the question text is empty or only whitespace
    pub fn new(id: u32, section: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        assert!(!text.trim().is_empty(), "Question text cannot be empty");
        Self {
            id,
            section: section.into(),
            text,
        }
    }

    /// Try to create a new question, returning None if the text is empty
    pub fn try_new(id: u32, section: impl Into<String>, text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            None
        } else {
            Some(Self {
                id,
                section: section.into(),
                text,
            })
        }
    }
}

impl std::fmt::Display for Question {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.id, self.text)
    }
}

/// The ordered question list for one application form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSet {
    pub questions: Vec<Question>,
}

impl QuestionSet {
    pub fn new(mut questions: Vec<Question>) -> Self {
        questions.sort_by_key(|q| q.id);
        Self { questions }
    }

    /// Parse a question set from its JSON artifact representation.
    ///
    /// Rejects entries with blank question text; the pipeline has
    /// nothing to retrieve or answer for them.
    pub fn from_json(json: &str) -> Result<Self, DomainError> {
        let set: QuestionSet = serde_json::from_str(json)
            .map_err(|e| DomainError::MalformedQuestionSet(e.to_string()))?;
        if let Some(blank) = set.questions.iter().find(|q| q.text.trim().is_empty()) {
            return Err(DomainError::InvalidQuestion(format!(
                "question {} has no text",
                blank.id
            )));
        }
        Ok(Self::new(set.questions))
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_creation() {
        let q = Question::new(1, "Company Profile", "What does the company do?");
        assert_eq!(q.id, 1);
        assert_eq!(q.section, "Company Profile");
        assert_eq!(q.text, "What does the company do?");
    }

    #[test]
    #[should_panic]
    fn test_empty_question_panics() {
        Question::new(1, "Section", "   ");
    }

    #[test]
    fn test_try_new_empty() {
        assert!(Question::try_new(1, "Section", "").is_none());
        assert!(Question::try_new(1, "Section", "  ").is_none());
    }

    #[test]
    fn test_serde_uses_question_field() {
        let q = Question::new(3, "Budget", "What is the total budget?");
        let json = serde_json::to_string(&q).unwrap();
        assert!(json.contains("\"question\""));
        let back: Question = serde_json::from_str(&json).unwrap();
        assert_eq!(q, back);
    }

    #[test]
    fn test_question_set_sorts_by_id() {
        let set = QuestionSet::new(vec![
            Question::new(3, "C", "Third?"),
            Question::new(1, "A", "First?"),
            Question::new(2, "B", "Second?"),
        ]);
        let ids: Vec<u32> = set.questions.iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_question_set_from_json() {
        let json = r#"{"questions": [
            {"id": 2, "section": "Budget", "question": "How much?"},
            {"id": 1, "section": "Profile", "question": "Who are you?"}
        ]}"#;
        let set = QuestionSet::from_json(json).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.questions[0].id, 1);
    }

    #[test]
    fn test_question_set_from_bad_json() {
        let err = QuestionSet::from_json("not json").unwrap_err();
        assert!(matches!(err, DomainError::MalformedQuestionSet(_)));
    }

    #[test]
    fn test_question_set_rejects_blank_text() {
        let json = r#"{"questions": [
            {"id": 1, "section": "Profile", "question": "   "}
        ]}"#;
        let err = QuestionSet::from_json(json).unwrap_err();
        assert!(matches!(err, DomainError::InvalidQuestion(_)));
    }
}
