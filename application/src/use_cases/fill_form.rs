//! Fill Form use case.
//!
//! Orchestrates the full pipeline: concurrent context retrieval, the
//! advisory budget estimate, then either one generation call or the
//! adaptive split followed by a polish pass that merges the partial
//! drafts into one coherent document.

use crate::config::FillParams;
use crate::ports::document_converter::{ConvertError, DocumentConverterPort};
use crate::ports::generation::{GenerationError, GenerationPort};
use crate::ports::progress::{NoProgress, PipelinePhase, ProgressNotifier};
use crate::ports::retrieval::{RetrievalFilter, RetrievalPort};
use crate::ports::token_counter::TokenCounterPort;
use crate::use_cases::estimate::BudgetEstimator;
use crate::use_cases::retrieve_contexts::RetrieveContextsUseCase;
use crate::use_cases::split_generate::{SplitError, SplitGenerateUseCase};
use formpilot_domain::{
    EnrichedQuestion, FormPromptTemplate, Question, TemplateDocument,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that can fail a whole form-fill request
#[derive(Error, Debug)]
pub enum FillFormError {
    #[error("No questions to fill")]
    NoQuestions,

    #[error("Template conversion failed: {0}")]
    Convert(#[from] ConvertError),

    #[error("Generation failed: {0}")]
    Generation(GenerationError),

    #[error("No split count up to {max_split} fit the generation budget")]
    SplitExhausted { max_split: usize },
}

impl From<SplitError> for FillFormError {
    fn from(e: SplitError) -> Self {
        match e {
            SplitError::Exhausted { max_split } => FillFormError::SplitExhausted { max_split },
            SplitError::Generation(e) => FillFormError::Generation(e),
        }
    }
}

/// Input for the FillForm use case
#[derive(Debug, Clone)]
pub struct FillFormInput {
    /// The blank application form
    pub template: TemplateDocument,
    /// Questions to answer, in canonical order
    pub questions: Vec<Question>,
    /// System instructions for drafting the form text
    pub writing_instructions: String,
    /// Simpler system instructions for the final polish pass
    pub polish_instructions: String,
    /// Metadata filter restricting retrieval to the applicant's documents
    pub filter: RetrievalFilter,
}

impl FillFormInput {
    pub fn new(
        template: TemplateDocument,
        questions: Vec<Question>,
        writing_instructions: impl Into<String>,
    ) -> Self {
        Self {
            template,
            questions,
            writing_instructions: writing_instructions.into(),
            polish_instructions: FormPromptTemplate::polish_system().to_string(),
            filter: RetrievalFilter::new(),
        }
    }

    pub fn with_filter(mut self, filter: RetrievalFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_polish_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.polish_instructions = instructions.into();
        self
    }
}

/// The completed form text plus the contexts it derived from
#[derive(Debug, Clone)]
pub struct FilledForm {
    pub text: String,
    pub enriched: Vec<EnrichedQuestion>,
}

/// Use case for filling out one application form
pub struct FillFormUseCase<R, G, C>
where
    R: RetrievalPort + 'static,
    G: GenerationPort + 'static,
    C: DocumentConverterPort,
{
    retrieval: Arc<R>,
    generation: Arc<G>,
    converter: Arc<C>,
    counter: Arc<dyn TokenCounterPort>,
    params: FillParams,
}

impl<R, G, C> FillFormUseCase<R, G, C>
where
    R: RetrievalPort + 'static,
    G: GenerationPort + 'static,
    C: DocumentConverterPort,
{
    pub fn new(
        retrieval: Arc<R>,
        generation: Arc<G>,
        converter: Arc<C>,
        counter: Arc<dyn TokenCounterPort>,
        params: FillParams,
    ) -> Self {
        Self {
            retrieval,
            generation,
            converter,
            counter,
            params,
        }
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: FillFormInput) -> Result<FilledForm, FillFormError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the full retrieve → estimate → generate pipeline.
    pub async fn execute_with_progress(
        &self,
        input: FillFormInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<FilledForm, FillFormError> {
        if input.questions.is_empty() {
            return Err(FillFormError::NoQuestions);
        }

        info!(
            questions = input.questions.len(),
            template = %input.template.name,
            "Starting form fill"
        );

        // ========== Phase 1: Retrieval ==========
        let retriever =
            RetrieveContextsUseCase::new(Arc::clone(&self.retrieval), self.params.clone());
        let enriched = retriever
            .execute_with_progress(&input.questions, &input.filter, progress)
            .await;

        let corpus = FormPromptTemplate::corpus(&enriched);

        // ========== Phase 2: Budget estimate ==========
        let template_text = self.converter.plain_text(&input.template).await?;
        let estimator = BudgetEstimator::new(
            Arc::clone(&self.counter),
            self.params.token_budget.clone(),
        );
        let tokens = estimator.estimate(&template_text, &corpus, &input.writing_instructions);
        info!(tokens, "Estimated single-call prompt size");

        // ========== Phase 3: Generation ==========
        let full_cap = self.params.token_budget.max_output_tokens();

        if estimator.fits_tokens(tokens) {
            progress.on_phase_start(&PipelinePhase::Generation, 1);
            match self
                .generation
                .generate(&input.template, &corpus, &input.writing_instructions, full_cap)
                .await
            {
                Ok(text) => {
                    info!("Form filled in a single call");
                    progress.on_task_complete(&PipelinePhase::Generation, "form", true);
                    progress.on_phase_complete(&PipelinePhase::Generation);
                    return Ok(FilledForm { text, enriched });
                }
                Err(GenerationError::InputTooLarge(message)) => {
                    // The backend's rejection is authoritative even when
                    // the estimate said otherwise.
                    warn!("Single call rejected as too large, splitting: {message}");
                    progress.on_task_complete(&PipelinePhase::Generation, "form", false);
                }
                Err(e) => return Err(FillFormError::Generation(e)),
            }
        } else {
            info!("Estimate exceeds the input ceiling, going straight to splitting");
        }

        // ========== Phase 4: Split + polish ==========
        let splitter =
            SplitGenerateUseCase::new(Arc::clone(&self.generation), self.params.clone());
        let parts = splitter
            .execute_with_progress(&enriched, &input.template, &input.writing_instructions, progress)
            .await?;

        let stitched = FormPromptTemplate::stitch_parts(&parts);

        progress.on_phase_start(&PipelinePhase::Polish, 1);
        let text = self
            .generation
            .generate(
                &input.template,
                &stitched,
                &input.polish_instructions,
                full_cap,
            )
            .await
            .map_err(FillFormError::Generation)?;
        progress.on_task_complete(&PipelinePhase::Polish, "form", true);
        progress.on_phase_complete(&PipelinePhase::Polish);

        info!(parts = parts.len(), "Form filled via split and polish");
        Ok(FilledForm { text, enriched })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::retrieval::{RetrievalError, RetrievalResponse, RetrievedChunk};
    use crate::ports::token_counter::HeuristicTokenCounter;
    use async_trait::async_trait;
    use formpilot_domain::{DocumentFormat, RetrievalStatus, TokenBudget};
    use std::sync::Mutex;

    // ==================== Test Mocks ====================

    struct MockRetrieval {
        failing_query: Option<String>,
    }

    #[async_trait]
    impl RetrievalPort for MockRetrieval {
        async fn retrieve(
            &self,
            query: &str,
            _filter: &RetrievalFilter,
        ) -> Result<RetrievalResponse, RetrievalError> {
            if self.failing_query.as_deref() == Some(query) {
                return Err(RetrievalError::Backend("no such index".into()));
            }
            Ok(RetrievalResponse {
                chunks: vec![RetrievedChunk {
                    text: format!("context for {query}"),
                    source_uri: Some("s3://docs/source.pdf".into()),
                    score: 0.7,
                }],
            })
        }
    }

    /// Generation backend scripted per call: `reject_first_n` calls fail
    /// with the budget signal, later calls echo a label.
    struct ScriptedGeneration {
        reject_first_n: usize,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedGeneration {
        fn new(reject_first_n: usize) -> Self {
            Self {
                reject_first_n,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GenerationPort for ScriptedGeneration {
        async fn generate(
            &self,
            _template: &TemplateDocument,
            prompt: &str,
            system: &str,
            _max_output_tokens: usize,
        ) -> Result<String, GenerationError> {
            let call_index = {
                let mut calls = self.calls.lock().unwrap();
                calls.push(format!("system={system}\n{prompt}"));
                calls.len()
            };
            if call_index <= self.reject_first_n {
                return Err(GenerationError::InputTooLarge("too big".into()));
            }
            Ok(format!("generated#{call_index}"))
        }
    }

    struct IdentityConverter;

    #[async_trait]
    impl DocumentConverterPort for IdentityConverter {
        async fn convert(
            &self,
            input: &[u8],
            _from: DocumentFormat,
            _to: DocumentFormat,
        ) -> Result<Vec<u8>, ConvertError> {
            Ok(input.to_vec())
        }
    }

    fn questions(n: u32) -> Vec<Question> {
        (1..=n)
            .map(|i| Question::new(i, format!("S{i}"), format!("Q{i}?")))
            .collect()
    }

    fn input(n: u32) -> FillFormInput {
        FillFormInput::new(
            TemplateDocument::docx("form", b"template text".to_vec()),
            questions(n),
            "fill out the form",
        )
        .with_filter(RetrievalFilter::new().equals("username", "alice"))
    }

    fn use_case(
        retrieval: MockRetrieval,
        generation: Arc<ScriptedGeneration>,
        budget: TokenBudget,
    ) -> FillFormUseCase<MockRetrieval, ScriptedGeneration, IdentityConverter> {
        FillFormUseCase::new(
            Arc::new(retrieval),
            generation,
            Arc::new(IdentityConverter),
            Arc::new(HeuristicTokenCounter),
            FillParams::default()
                .with_max_retries(1)
                .with_token_budget(budget),
        )
    }

    #[tokio::test]
    async fn test_single_call_when_prompt_fits() {
        let generation = Arc::new(ScriptedGeneration::new(0));
        let filler = use_case(
            MockRetrieval {
                failing_query: None,
            },
            Arc::clone(&generation),
            TokenBudget::new(100_000, 1_000, 500),
        );

        let filled = filler.execute(input(5)).await.unwrap();

        // exactly one generation call, and its text is the output
        assert_eq!(generation.call_count(), 1);
        assert_eq!(filled.text, "generated#1");
        assert_eq!(filled.enriched.len(), 5);
    }

    #[tokio::test]
    async fn test_split_path_makes_partials_plus_polish() {
        // a tiny input ceiling forces the split path without a wasted
        // single-size call
        let generation = Arc::new(ScriptedGeneration::new(0));
        let filler = use_case(
            MockRetrieval {
                failing_query: None,
            },
            Arc::clone(&generation),
            TokenBudget::new(1, 1_000, 500),
        );

        let filled = filler.execute(input(5)).await.unwrap();

        // k=2 canary + second slice + polish = 3 calls
        assert_eq!(generation.call_count(), 3);
        assert_eq!(filled.text, "generated#3");

        // polish call receives both partial drafts stitched with
        // single newlines and the simpler polish instructions
        let polish_call = &generation.calls()[2];
        assert!(polish_call.contains("generated#1\ngenerated#2"));
        assert!(polish_call.contains("application form template"));
    }

    #[tokio::test]
    async fn test_backend_rejection_overrides_estimate() {
        // the estimate fits, but the first (full) call is rejected;
        // the fill reroutes through the splitter
        let generation = Arc::new(ScriptedGeneration::new(1));
        let filler = use_case(
            MockRetrieval {
                failing_query: None,
            },
            Arc::clone(&generation),
            TokenBudget::new(100_000, 1_000, 500),
        );

        let filled = filler.execute(input(5)).await.unwrap();

        // full call (rejected) + canary + second slice + polish
        assert_eq!(generation.call_count(), 4);
        assert_eq!(filled.text, "generated#4");
    }

    #[tokio::test]
    async fn test_failed_retrieval_still_fills_form() {
        let generation = Arc::new(ScriptedGeneration::new(0));
        let filler = use_case(
            MockRetrieval {
                failing_query: Some("Q2?".into()),
            },
            Arc::clone(&generation),
            TokenBudget::new(100_000, 1_000, 500),
        );

        let filled = filler.execute(input(5)).await.unwrap();

        let failed = &filled.enriched[1];
        assert_eq!(failed.id(), 2);
        assert_eq!(failed.status, RetrievalStatus::Failed);
        assert!(failed.context.is_empty());
        assert_eq!(
            filled.enriched.iter().filter(|e| e.is_success()).count(),
            4
        );
    }

    #[tokio::test]
    async fn test_empty_question_set_rejected() {
        let generation = Arc::new(ScriptedGeneration::new(0));
        let filler = use_case(
            MockRetrieval {
                failing_query: None,
            },
            Arc::clone(&generation),
            TokenBudget::default(),
        );

        let err = filler.execute(input(0)).await.unwrap_err();
        assert!(matches!(err, FillFormError::NoQuestions));
    }

    #[tokio::test]
    async fn test_split_exhaustion_fails_whole_fill() {
        // every call is rejected: single call, then every canary
        let generation = Arc::new(ScriptedGeneration::new(usize::MAX));
        let filler = use_case(
            MockRetrieval {
                failing_query: None,
            },
            Arc::clone(&generation),
            TokenBudget::new(100_000, 1_000, 500),
        );

        let err = filler.execute(input(8)).await.unwrap_err();
        assert!(matches!(
            err,
            FillFormError::SplitExhausted { max_split: 4 }
        ));
    }
}
