//! Retrieval with bounded exponential-backoff retry.
//!
//! [`RetryingFetcher`] wraps one [`RetrievalPort`] call. Rate-limit
//! errors are retried with exponential backoff plus a small linear
//! jitter term; any other error fails the fetch immediately. The backoff
//! sleep suspends only the issuing task.

use crate::ports::retrieval::{RetrievalError, RetrievalFilter, RetrievalPort, RetrievalResponse};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Errors from a retried fetch
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Max retries ({retries}) exceeded for question: {query}")]
    MaxRetriesExceeded { retries: usize, query: String },

    #[error(transparent)]
    Retrieval(#[from] RetrievalError),
}

/// Backoff before retry number `attempt + 1`: `2^attempt` seconds plus
/// `0.1 * (attempt + 1)` seconds of jitter.
pub(crate) fn backoff_delay(attempt: usize) -> Duration {
    let seconds = 2f64.powi(attempt as i32) + 0.1 * (attempt + 1) as f64;
    Duration::from_secs_f64(seconds)
}

/// One retrieval call with bounded retry on throttling
pub struct RetryingFetcher<R: RetrievalPort> {
    port: Arc<R>,
    max_retries: usize,
}

impl<R: RetrievalPort> RetryingFetcher<R> {
    pub fn new(port: Arc<R>, max_retries: usize) -> Self {
        Self { port, max_retries }
    }

    /// Fetch context for `query`, retrying up to `max_retries` attempts
    /// on rate-limit errors.
    pub async fn fetch(
        &self,
        query: &str,
        filter: &RetrievalFilter,
    ) -> Result<RetrievalResponse, FetchError> {
        for attempt in 0..self.max_retries {
            match self.port.retrieve(query, filter).await {
                Ok(response) => return Ok(response),
                Err(RetrievalError::RateLimited(message)) => {
                    if attempt + 1 < self.max_retries {
                        let wait = backoff_delay(attempt);
                        warn!(
                            attempt = attempt + 1,
                            wait_secs = wait.as_secs_f64(),
                            "Throttled: {message}"
                        );
                        tokio::time::sleep(wait).await;
                    }
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(FetchError::MaxRetriesExceeded {
            retries: self.max_retries,
            query: query.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    // ==================== Test Mocks ====================

    struct MockRetrieval {
        responses: Mutex<VecDeque<Result<RetrievalResponse, RetrievalError>>>,
        calls: Mutex<usize>,
    }

    impl MockRetrieval {
        fn new(responses: Vec<Result<RetrievalResponse, RetrievalError>>) -> Self {
            Self {
                responses: Mutex::new(VecDeque::from(responses)),
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl RetrievalPort for MockRetrieval {
        async fn retrieve(
            &self,
            _query: &str,
            _filter: &RetrievalFilter,
        ) -> Result<RetrievalResponse, RetrievalError> {
            *self.calls.lock().unwrap() += 1;
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(RetrievalError::Backend("no more responses".into())))
        }
    }

    fn throttled() -> Result<RetrievalResponse, RetrievalError> {
        Err(RetrievalError::RateLimited("throttled".into()))
    }

    #[test]
    fn test_backoff_schedule() {
        assert_eq!(backoff_delay(0), Duration::from_secs_f64(1.1));
        assert_eq!(backoff_delay(1), Duration::from_secs_f64(2.2));
        assert_eq!(backoff_delay(2), Duration::from_secs_f64(4.3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_throttle() {
        let port = Arc::new(MockRetrieval::new(vec![
            throttled(),
            Ok(RetrievalResponse::default()),
        ]));
        let fetcher = RetryingFetcher::new(Arc::clone(&port), 3);

        let result = fetcher.fetch("q", &RetrievalFilter::new()).await;
        assert!(result.is_ok());
        assert_eq!(port.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausts_retries_on_repeated_throttle() {
        let port = Arc::new(MockRetrieval::new(vec![
            throttled(),
            throttled(),
            throttled(),
        ]));
        let fetcher = RetryingFetcher::new(Arc::clone(&port), 3);

        let err = fetcher
            .fetch("the question", &RetrievalFilter::new())
            .await
            .unwrap_err();
        // exactly max_retries attempts, then the distinguishing error
        assert_eq!(port.calls(), 3);
        match err {
            FetchError::MaxRetriesExceeded { retries, query } => {
                assert_eq!(retries, 3);
                assert_eq!(query, "the question");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_retry_on_backend_error() {
        let port = Arc::new(MockRetrieval::new(vec![Err(RetrievalError::Backend(
            "access denied".into(),
        ))]));
        let fetcher = RetryingFetcher::new(Arc::clone(&port), 3);

        let err = fetcher.fetch("q", &RetrievalFilter::new()).await.unwrap_err();
        assert_eq!(port.calls(), 1);
        assert!(matches!(err, FetchError::Retrieval(RetrievalError::Backend(_))));
    }
}
