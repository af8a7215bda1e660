//! Adaptive split-and-generate.
//!
//! When the combined prompt cannot fit one generation call, this use
//! case searches for the smallest split count `k` whose slices each fit,
//! starting at 2 and capped at `max_split`. Fewer slices mean fewer
//! stitching seams for the polish pass to smooth over.
//!
//! For each candidate `k`, slice 0 is generated serially first (the
//! canary). Only when the canary fits are the remaining `k - 1` slices
//! committed to a bounded concurrent fan-out; a canary budget rejection
//! discards the attempt and moves on to `k + 1`.

use crate::config::FillParams;
use crate::ports::generation::{GenerationError, GenerationPort};
use crate::ports::progress::{NoProgress, PipelinePhase, ProgressNotifier};
use crate::use_cases::pool::BoundedPool;
use formpilot_domain::{EnrichedQuestion, FormPromptTemplate, TemplateDocument, slice_ranges};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// Errors from the split search
#[derive(Error, Debug)]
pub enum SplitError {
    #[error("No split count up to {max_split} fit the generation budget")]
    Exhausted { max_split: usize },

    #[error("Generation failed during split: {0}")]
    Generation(#[from] GenerationError),
}

/// Use case for generating the form text across several partial calls
pub struct SplitGenerateUseCase<G: GenerationPort + 'static> {
    generation: Arc<G>,
    params: FillParams,
}

impl<G: GenerationPort + 'static> SplitGenerateUseCase<G> {
    pub fn new(generation: Arc<G>, params: FillParams) -> Self {
        Self { generation, params }
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        enriched: &[EnrichedQuestion],
        template: &TemplateDocument,
        system: &str,
    ) -> Result<Vec<String>, SplitError> {
        self.execute_with_progress(enriched, template, system, &NoProgress)
            .await
    }

    /// Search for the smallest viable split count and generate all
    /// partial drafts, returned in slice order (canary first).
    pub async fn execute_with_progress(
        &self,
        enriched: &[EnrichedQuestion],
        template: &TemplateDocument,
        system: &str,
        progress: &dyn ProgressNotifier,
    ) -> Result<Vec<String>, SplitError> {
        let max_split = self.params.max_split;

        for k in 2..=max_split {
            let ranges = slice_ranges(enriched.len(), k).expect("split count is at least 2");
            info!(k, questions = enriched.len(), "Probing split count");
            progress.on_phase_start(&PipelinePhase::Generation, k);

            let canary_prompt = FormPromptTemplate::corpus(&enriched[ranges[0].clone()]);
            let partial_cap = self.params.token_budget.partial_output_tokens();

            match self
                .generation
                .generate(template, &canary_prompt, system, partial_cap)
                .await
            {
                Ok(canary_text) => {
                    info!(k, "Canary slice fits, committing remaining slices");
                    progress.on_task_complete(&PipelinePhase::Generation, "slice 1", true);
                    let parts = self
                        .generate_rest(enriched, template, system, &ranges, canary_text, progress)
                        .await?;
                    progress.on_phase_complete(&PipelinePhase::Generation);
                    return Ok(parts);
                }
                Err(GenerationError::InputTooLarge(message)) => {
                    // Discard this attempt entirely and widen the split.
                    warn!(k, "Canary slice too large, trying a finer split: {message}");
                    progress.on_task_complete(&PipelinePhase::Generation, "slice 1", false);
                }
                Err(e) => return Err(SplitError::Generation(e)),
            }
        }

        Err(SplitError::Exhausted { max_split })
    }

    /// Generate slices 1..k concurrently and assemble all parts in
    /// submission order, canary first.
    async fn generate_rest(
        &self,
        enriched: &[EnrichedQuestion],
        template: &TemplateDocument,
        system: &str,
        ranges: &[std::ops::Range<usize>],
        canary_text: String,
        progress: &dyn ProgressNotifier,
    ) -> Result<Vec<String>, SplitError> {
        let k = ranges.len();
        let mut parts: Vec<Option<String>> = vec![None; k];
        parts[0] = Some(canary_text);

        // Generation calls are heavier than retrieval, so the fan-out is
        // kept narrow regardless of k.
        let pool = BoundedPool::new(k.min(self.params.max_generation_workers));
        let partial_cap = self.params.token_budget.partial_output_tokens();
        let mut join_set = JoinSet::new();

        for (i, range) in ranges.iter().enumerate().skip(1) {
            if range.is_empty() {
                continue;
            }
            let generation = Arc::clone(&self.generation);
            let prompt = FormPromptTemplate::corpus(&enriched[range.clone()]);
            let template = template.clone();
            let system = system.to_string();

            pool.spawn(&mut join_set, async move {
                let result = generation
                    .generate(&template, &prompt, &system, partial_cap)
                    .await;
                (i, result)
            });
        }

        let mut failure: Option<GenerationError> = None;

        while let Some(result) = join_set.join_next().await {
            match result {
                Ok((i, Ok(text))) => {
                    progress.on_task_complete(
                        &PipelinePhase::Generation,
                        &format!("slice {}", i + 1),
                        true,
                    );
                    parts[i] = Some(text);
                }
                Ok((i, Err(e))) => {
                    // A committed slice that fails (even on budget) is
                    // fatal: a silently missing part would under-cover
                    // the question set.
                    warn!(slice = i + 1, "Partial generation failed: {e}");
                    progress.on_task_complete(
                        &PipelinePhase::Generation,
                        &format!("slice {}", i + 1),
                        false,
                    );
                    failure.get_or_insert(e);
                }
                Err(e) => {
                    warn!("Task join error: {}", e);
                    failure.get_or_insert(GenerationError::Failed(e.to_string()));
                }
            }
        }

        if let Some(e) = failure {
            return Err(SplitError::Generation(e));
        }

        // Empty trailing ranges (k > question count) contribute nothing.
        Ok(parts.into_iter().flatten().collect())
    }
}
