//! Generation port
//!
//! The sole LLM-invocation boundary: one template document attachment,
//! free prompt text, system instructions, and an explicit output-token
//! cap.

use async_trait::async_trait;
use formpilot_domain::TemplateDocument;
use thiserror::Error;

/// Errors a generation backend can report
///
/// Callers switch on the variant: `InputTooLarge` is the authoritative
/// budget-exceeded signal that triggers splitting; everything else is
/// terminal for the enclosing call.
#[derive(Error, Debug, Clone)]
pub enum GenerationError {
    #[error("Generation input too large: {0}")]
    InputTooLarge(String),

    #[error("Generation throttled: {0}")]
    RateLimited(String),

    #[error("Generation failed: {0}")]
    Failed(String),
}

impl GenerationError {
    pub fn is_input_too_large(&self) -> bool {
        matches!(self, GenerationError::InputTooLarge(_))
    }
}

/// Port for a single model invocation
#[async_trait]
pub trait GenerationPort: Send + Sync {
    /// Generate text from the template document, prompt, and system
    /// instructions, producing at most `max_output_tokens` tokens.
    async fn generate(
        &self,
        template: &TemplateDocument,
        prompt: &str,
        system: &str,
        max_output_tokens: usize,
    ) -> Result<String, GenerationError>;
}
