//! Generate Questions use case.
//!
//! Extracts the question set from a blank form template with one
//! generation call. The model is asked for JSON; responses wrapped in a
//! fenced code block are unwrapped before parsing.

use crate::ports::generation::{GenerationError, GenerationPort};
use formpilot_domain::{DomainError, FormPromptTemplate, QuestionSet, TemplateDocument};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors from question extraction
#[derive(Error, Debug)]
pub enum GenerateQuestionsError {
    #[error("Generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("Model response was not a valid question set: {0}")]
    Parse(#[from] DomainError),
}

/// Strip a fenced code block (```json ... ``` or ``` ... ```) wrapper,
/// returning the inner text. Text without a fence is returned as-is.
fn strip_code_fence(text: &str) -> String {
    let mut in_block = false;
    let mut block = String::new();

    for line in text.lines() {
        let trimmed = line.trim();
        if !in_block && (trimmed == "```json" || trimmed == "```") {
            in_block = true;
            block.clear();
        } else if in_block && trimmed == "```" {
            return block;
        } else if in_block {
            block.push_str(line);
            block.push('\n');
        }
    }

    text.to_string()
}

/// Use case for extracting a form's question set
pub struct GenerateQuestionsUseCase<G: GenerationPort> {
    generation: Arc<G>,
    max_output_tokens: usize,
}

impl<G: GenerationPort> GenerateQuestionsUseCase<G> {
    pub fn new(generation: Arc<G>, max_output_tokens: usize) -> Self {
        Self {
            generation,
            max_output_tokens,
        }
    }

    /// Extract every question an applicant must answer from `template`.
    pub async fn execute(
        &self,
        template: &TemplateDocument,
    ) -> Result<QuestionSet, GenerateQuestionsError> {
        let raw = self
            .generation
            .generate(
                template,
                "Extract the questions from the attached application form.",
                FormPromptTemplate::question_extraction_system(),
                self.max_output_tokens,
            )
            .await?;

        let json = strip_code_fence(&raw);
        let set = QuestionSet::from_json(&json)?;
        if set.is_empty() {
            return Err(DomainError::NoQuestions.into());
        }
        info!(questions = set.len(), template = %template.name, "Extracted question set");
        Ok(set)
    }
}
