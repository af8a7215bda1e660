//! Retrieval domain
//!
//! Types describing the outcome of fetching knowledge-base context for a
//! form question.

mod enriched;

pub use enriched::{CHUNK_SEPARATOR, EnrichedQuestion, RetrievalStatus, SourceRef};
