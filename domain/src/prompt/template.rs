//! Prompt templates for the form-filling flow

use crate::retrieval::EnrichedQuestion;

/// Templates for generating prompts at each stage
pub struct FormPromptTemplate;

impl FormPromptTemplate {
    /// One prompt block for a single enriched question.
    pub fn enriched_block(section: &str, question: &str, context: &str) -> String {
        format!("Section: {section}\nQuestion: {question}\nContext: {context}")
    }

    /// The combined corpus for a set of enriched questions: one block per
    /// question, joined by blank lines, in the order given.
    pub fn corpus(enriched: &[EnrichedQuestion]) -> String {
        enriched
            .iter()
            .map(|e| Self::enriched_block(&e.question.section, &e.question.text, &e.context))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Join partial drafts before the polish pass.
    pub fn stitch_parts(parts: &[String]) -> String {
        parts.join("\n")
    }

    /// System prompt for the final polish pass over stitched partials.
    pub fn polish_system() -> &'static str {
        "I have attached the application form template. Refer to it and fill out \
         the application form from the context provided"
    }

    /// System prompt for extracting a question set from a form template.
    pub fn question_extraction_system() -> &'static str {
        r#"You are analyzing a grant application form. Extract every question an
applicant must answer, in the order it appears in the form.

Respond with JSON only, in this exact shape:

{"questions": [{"id": 1, "section": "<section heading>", "question": "<question text>"}]}

Number the ids sequentially from 1. Use the nearest section heading for
each question. Do not invent questions that are not in the form."#
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::question::Question;

    fn enriched(id: u32, section: &str, text: &str, context: &str) -> EnrichedQuestion {
        EnrichedQuestion::success(Question::new(id, section, text), context, vec![], 1)
    }

    #[test]
    fn test_enriched_block_format() {
        let block = FormPromptTemplate::enriched_block("Profile", "Who?", "A company.");
        assert_eq!(block, "Section: Profile\nQuestion: Who?\nContext: A company.");
    }

    #[test]
    fn test_corpus_joins_with_blank_lines() {
        let corpus = FormPromptTemplate::corpus(&[
            enriched(1, "A", "First?", "ctx1"),
            enriched(2, "B", "Second?", "ctx2"),
        ]);
        assert_eq!(
            corpus,
            "Section: A\nQuestion: First?\nContext: ctx1\n\n\
             Section: B\nQuestion: Second?\nContext: ctx2"
        );
    }

    #[test]
    fn test_corpus_keeps_failed_questions() {
        // A failed retrieval still contributes its block, with empty context.
        let failed =
            EnrichedQuestion::failure(Question::new(3, "C", "Third?"), "throttled");
        let corpus = FormPromptTemplate::corpus(&[failed]);
        assert_eq!(corpus, "Section: C\nQuestion: Third?\nContext: ");
    }

    #[test]
    fn test_stitch_parts_single_newline() {
        let parts = vec!["part one".to_string(), "part two".to_string()];
        assert_eq!(FormPromptTemplate::stitch_parts(&parts), "part one\npart two");
    }
}
