//! Knowledge-base retrieval port
//!
//! Defines the interface for fetching supporting context for one form
//! question from the document knowledge base.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors a retrieval backend can report
///
/// The variants are the retry policy: `RateLimited` is retryable with
/// backoff, anything else fails the attempt immediately.
#[derive(Error, Debug, Clone)]
pub enum RetrievalError {
    #[error("Retrieval throttled: {0}")]
    RateLimited(String),

    #[error("Retrieval backend error: {0}")]
    Backend(String),
}

impl RetrievalError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, RetrievalError::RateLimited(_))
    }
}

/// One metadata filter value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Str(String),
    Int(i64),
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::Str(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::Str(s)
    }
}

impl From<i64> for FilterValue {
    fn from(v: i64) -> Self {
        FilterValue::Int(v)
    }
}

/// Equality-predicate set applied to document metadata during retrieval.
///
/// All clauses must match (logical AND).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetrievalFilter {
    pub clauses: Vec<(String, FilterValue)>,
}

impl RetrievalFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn equals(mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.clauses.push((key.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

/// One retrieved context chunk with its citation
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievedChunk {
    pub text: String,
    /// URI of the source document, when the backend reports one
    pub source_uri: Option<String>,
    pub score: f64,
}

/// Response from one retrieval call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetrievalResponse {
    pub chunks: Vec<RetrievedChunk>,
}

/// Port for knowledge-base retrieval
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait RetrievalPort: Send + Sync {
    /// Retrieve context chunks matching `query`, restricted to documents
    /// whose metadata satisfies `filter`.
    async fn retrieve(
        &self,
        query: &str,
        filter: &RetrievalFilter,
    ) -> Result<RetrievalResponse, RetrievalError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_builder() {
        let filter = RetrievalFilter::new()
            .equals("username", "alice")
            .equals("year", 2026i64);
        assert_eq!(filter.clauses.len(), 2);
        assert_eq!(filter.clauses[0].1, FilterValue::Str("alice".to_string()));
        assert_eq!(filter.clauses[1].1, FilterValue::Int(2026));
    }

    #[test]
    fn test_rate_limited_check() {
        assert!(RetrievalError::RateLimited("slow down".into()).is_rate_limited());
        assert!(!RetrievalError::Backend("boom".into()).is_rate_limited());
    }
}
