//! Concurrent context retrieval for a question set.
//!
//! Fans the questions out over a semaphore-bounded set of tokio tasks,
//! one per question. Each task fetches through [`RetryingFetcher`],
//! extracts context chunks and source citations, and records its outcome
//! in the injected [`BatchProgress`] counters. The batch never fails as
//! a whole: every per-question error becomes a `Failed` entry.
//!
//! Results are collected in completion order and sorted by question id
//! before return, so output ordering is deterministic regardless of task
//! scheduling.

use crate::config::FillParams;
use crate::ports::progress::{BatchProgress, NoProgress, PipelinePhase, ProgressNotifier};
use crate::ports::retrieval::{RetrievalFilter, RetrievalPort};
use crate::use_cases::fetch::RetryingFetcher;
use crate::use_cases::pool::BoundedPool;
use formpilot_domain::{CHUNK_SEPARATOR, EnrichedQuestion, Question, SourceRef};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// Use case for retrieving context for every question of a form
pub struct RetrieveContextsUseCase<R: RetrievalPort + 'static> {
    port: Arc<R>,
    params: FillParams,
}

impl<R: RetrievalPort + 'static> RetrieveContextsUseCase<R> {
    pub fn new(port: Arc<R>, params: FillParams) -> Self {
        Self { port, params }
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        questions: &[Question],
        filter: &RetrievalFilter,
    ) -> Vec<EnrichedQuestion> {
        self.execute_with_progress(questions, filter, &NoProgress)
            .await
    }

    /// Retrieve context for all questions concurrently.
    ///
    /// Returns exactly one [`EnrichedQuestion`] per input question,
    /// sorted by id.
    pub async fn execute_with_progress(
        &self,
        questions: &[Question],
        filter: &RetrievalFilter,
        progress: &dyn ProgressNotifier,
    ) -> Vec<EnrichedQuestion> {
        info!(
            questions = questions.len(),
            workers = self.params.max_retrieval_workers,
            "Starting concurrent retrieval"
        );
        progress.on_phase_start(&PipelinePhase::Retrieval, questions.len());

        let counters = Arc::new(BatchProgress::new(questions.len()));
        let pool = BoundedPool::new(self.params.max_retrieval_workers);
        let mut join_set = JoinSet::new();

        for question in questions {
            let port = Arc::clone(&self.port);
            let question = question.clone();
            let filter = filter.clone();
            let counters = Arc::clone(&counters);
            let max_retries = self.params.max_retries;

            pool.spawn(&mut join_set, async move {
                let fetcher = RetryingFetcher::new(port, max_retries);
                Self::enrich_question(&fetcher, question, &filter, &counters).await
            });
        }

        let mut enriched = Vec::with_capacity(questions.len());

        while let Some(result) = join_set.join_next().await {
            match result {
                Ok(entry) => {
                    progress.on_task_complete(
                        &PipelinePhase::Retrieval,
                        &entry.question.text,
                        entry.is_success(),
                    );
                    enriched.push(entry);
                }
                Err(e) => {
                    warn!("Task join error: {}", e);
                }
            }
        }

        // Deterministic output order, independent of completion order
        enriched.sort_by_key(|e| e.id());

        let snapshot = counters.snapshot();
        info!(
            total = snapshot.total,
            completed = snapshot.completed,
            failed = snapshot.failed,
            "Retrieval complete"
        );
        progress.on_phase_complete(&PipelinePhase::Retrieval);

        enriched
    }

    /// Fetch and extract context for one question. Never fails: any
    /// error is folded into a `Failed` entry.
    async fn enrich_question(
        fetcher: &RetryingFetcher<R>,
        question: Question,
        filter: &RetrievalFilter,
        counters: &BatchProgress,
    ) -> EnrichedQuestion {
        match fetcher.fetch(&question.text, filter).await {
            Ok(response) => {
                let mut chunks = Vec::new();
                let mut sources = Vec::new();

                for chunk in response.chunks {
                    if chunk.text.is_empty() {
                        continue;
                    }
                    chunks.push(chunk.text);
                    if let Some(uri) = chunk.source_uri {
                        sources.push(SourceRef::new(uri, chunk.score));
                    }
                }

                let num_chunks = chunks.len();
                let context = chunks.join(CHUNK_SEPARATOR);

                let snapshot = counters.complete_one();
                info!(
                    id = question.id,
                    chunks = num_chunks,
                    completed = snapshot.completed,
                    total = snapshot.total,
                    "Context retrieved"
                );

                EnrichedQuestion::success(question, context, sources, num_chunks)
            }
            Err(e) => {
                let snapshot = counters.fail_one();
                warn!(
                    id = question.id,
                    failed = snapshot.failed,
                    "Retrieval failed: {e}"
                );
                EnrichedQuestion::failure(question, e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::retrieval::{RetrievalError, RetrievalResponse, RetrievedChunk};
    use async_trait::async_trait;
    use formpilot_domain::RetrievalStatus;

    // ==================== Test Mocks ====================

    /// Backend that answers from a fixed per-query table.
    struct TableRetrieval {
        failing_query: Option<String>,
    }

    impl TableRetrieval {
        fn new() -> Self {
            Self {
                failing_query: None,
            }
        }

        fn failing_on(query: &str) -> Self {
            Self {
                failing_query: Some(query.to_string()),
            }
        }
    }

    #[async_trait]
    impl RetrievalPort for TableRetrieval {
        async fn retrieve(
            &self,
            query: &str,
            _filter: &RetrievalFilter,
        ) -> Result<RetrievalResponse, RetrievalError> {
            if self.failing_query.as_deref() == Some(query) {
                return Err(RetrievalError::Backend("index corrupt".into()));
            }
            Ok(RetrievalResponse {
                chunks: vec![
                    RetrievedChunk {
                        text: format!("context for {query}"),
                        source_uri: Some("s3://docs/a.pdf".into()),
                        score: 0.9,
                    },
                    RetrievedChunk {
                        text: "more context".into(),
                        source_uri: None,
                        score: 0.5,
                    },
                ],
            })
        }
    }

    fn questions(n: u32) -> Vec<Question> {
        (1..=n)
            .map(|i| Question::new(i, format!("Section {i}"), format!("Question {i}?")))
            .collect()
    }

    fn use_case<R: RetrievalPort + 'static>(port: R) -> RetrieveContextsUseCase<R> {
        RetrieveContextsUseCase::new(Arc::new(port), FillParams::default().with_max_retries(1))
    }

    #[tokio::test]
    async fn test_one_entry_per_question_sorted_by_id() {
        let retriever = use_case(TableRetrieval::new());
        let enriched = retriever
            .execute(&questions(9), &RetrievalFilter::new())
            .await;

        assert_eq!(enriched.len(), 9);
        let ids: Vec<u32> = enriched.iter().map(|e| e.id()).collect();
        assert_eq!(ids, (1..=9).collect::<Vec<u32>>());
        assert!(enriched.iter().all(|e| e.is_success()));
    }

    #[tokio::test]
    async fn test_chunks_joined_with_separator() {
        let retriever = use_case(TableRetrieval::new());
        let enriched = retriever
            .execute(&questions(1), &RetrievalFilter::new())
            .await;

        assert_eq!(
            enriched[0].context,
            "context for Question 1?\n\n---\n\nmore context"
        );
        assert_eq!(enriched[0].num_chunks, 2);
        // only chunks with a source uri produce citations
        assert_eq!(enriched[0].sources.len(), 1);
        assert_eq!(enriched[0].sources[0].uri, "s3://docs/a.pdf");
    }

    #[tokio::test]
    async fn test_single_failure_does_not_abort_batch() {
        let retriever = use_case(TableRetrieval::failing_on("Question 3?"));
        let enriched = retriever
            .execute(&questions(5), &RetrievalFilter::new())
            .await;

        assert_eq!(enriched.len(), 5);
        let failed = &enriched[2];
        assert_eq!(failed.id(), 3);
        assert_eq!(failed.status, RetrievalStatus::Failed);
        assert!(failed.context.is_empty());
        assert!(failed.error.is_some());
        assert_eq!(enriched.iter().filter(|e| e.is_success()).count(), 4);
    }

    #[tokio::test]
    async fn test_idempotent_across_runs() {
        let retriever = use_case(TableRetrieval::failing_on("Question 2?"));
        let first = retriever
            .execute(&questions(8), &RetrievalFilter::new())
            .await;
        let second = retriever
            .execute(&questions(8), &RetrievalFilter::new())
            .await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_narrow_worker_pool_still_covers_all_questions() {
        let retriever = RetrieveContextsUseCase::new(
            Arc::new(TableRetrieval::new()),
            FillParams::default()
                .with_max_retrieval_workers(2)
                .with_max_retries(1),
        );
        let enriched = retriever
            .execute(&questions(12), &RetrievalFilter::new())
            .await;
        assert_eq!(enriched.len(), 12);
    }
}
