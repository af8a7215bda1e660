//! Ports (interfaces) consumed by the application layer.
//!
//! Each port is an async trait implemented by an infrastructure adapter:
//!
//! - [`retrieval::RetrievalPort`] — knowledge-base context retrieval
//! - [`generation::GenerationPort`] — one LLM invocation
//! - [`token_counter::TokenCounterPort`] — deterministic token counting
//! - [`object_store::ObjectStorePort`] — artifact blobs by key
//! - [`document_converter::DocumentConverterPort`] — format conversion
//! - [`progress::ProgressNotifier`] — UI progress callbacks

pub mod document_converter;
pub mod generation;
pub mod object_store;
pub mod progress;
pub mod retrieval;
pub mod token_counter;
