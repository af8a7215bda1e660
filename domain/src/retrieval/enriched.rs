//! Enriched question value objects - immutable retrieval outcomes.
//!
//! An [`EnrichedQuestion`] pairs one form [`Question`] with the context
//! retrieved for it. Exactly one is produced per input question; a
//! retrieval failure yields a `Failed` entry with empty context rather
//! than aborting the batch.

use crate::core::question::Question;
use serde::{Deserialize, Serialize};

/// Separator placed between retrieved context chunks when they are
/// joined into one context string.
pub const CHUNK_SEPARATOR: &str = "\n\n---\n\n";

/// Whether retrieval for a question succeeded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetrievalStatus {
    Success,
    Failed,
}

/// Source citation for one retrieved context chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRef {
    /// URI of the source document the chunk came from
    pub uri: String,
    /// Relevance score reported by the retrieval backend
    pub score: f64,
}

impl SourceRef {
    pub fn new(uri: impl Into<String>, score: f64) -> Self {
        Self {
            uri: uri.into(),
            score,
        }
    }
}

/// A form question together with its retrieved context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedQuestion {
    #[serde(flatten)]
    pub question: Question,
    /// Retrieved context chunks joined with [`CHUNK_SEPARATOR`]
    pub context: String,
    /// Per-chunk source citations
    #[serde(default)]
    pub sources: Vec<SourceRef>,
    /// Number of context chunks that were retrieved
    #[serde(default)]
    pub num_chunks: usize,
    pub status: RetrievalStatus,
    /// Error message if retrieval failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EnrichedQuestion {
    /// Creates a successful retrieval outcome.
    pub fn success(
        question: Question,
        context: impl Into<String>,
        sources: Vec<SourceRef>,
        num_chunks: usize,
    ) -> Self {
        Self {
            question,
            context: context.into(),
            sources,
            num_chunks,
            status: RetrievalStatus::Success,
            error: None,
        }
    }

    /// Creates a failed retrieval outcome with empty context.
    pub fn failure(question: Question, error: impl Into<String>) -> Self {
        Self {
            question,
            context: String::new(),
            sources: Vec::new(),
            num_chunks: 0,
            status: RetrievalStatus::Failed,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == RetrievalStatus::Success
    }

    pub fn id(&self) -> u32 {
        self.question.id
    }
}
