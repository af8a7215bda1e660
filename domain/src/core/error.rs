//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("No questions in the question set")]
    NoQuestions,

    #[error("Invalid question: {0}")]
    InvalidQuestion(String),

    #[error("Invalid split count: {0} (must be at least 2)")]
    InvalidSplitCount(usize),

    #[error("Question set is not valid JSON: {0}")]
    MalformedQuestionSet(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_questions_display() {
        let error = DomainError::NoQuestions;
        assert_eq!(error.to_string(), "No questions in the question set");
    }

    #[test]
    fn test_invalid_split_count_display() {
        let error = DomainError::InvalidSplitCount(1);
        assert_eq!(
            error.to_string(),
            "Invalid split count: 1 (must be at least 2)"
        );
    }
}
