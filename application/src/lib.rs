//! Application layer for formpilot
//!
//! Use cases orchestrating the form-filling pipeline, and the ports they
//! depend on. Adapters for the ports live in the infrastructure layer.
//!
//! # Pipeline
//!
//! 1. [`RetrieveContextsUseCase`] — fetch knowledge-base context for
//!    every question concurrently, with bounded retry on throttling
//! 2. [`BudgetEstimator`] — decide whether one generation call can hold
//!    the whole prompt
//! 3. [`FillFormUseCase`] — single-call path, or
//!    [`SplitGenerateUseCase`] + a polish pass when the prompt is too
//!    large

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::FillParams;
pub use ports::{
    document_converter::{ConvertError, DocumentConverterPort},
    generation::{GenerationError, GenerationPort},
    object_store::{ObjectStorePort, StoreError},
    progress::{BatchProgress, NoProgress, PipelinePhase, ProgressNotifier, ProgressSnapshot},
    retrieval::{
        FilterValue, RetrievalError, RetrievalFilter, RetrievalPort, RetrievalResponse,
        RetrievedChunk,
    },
    token_counter::TokenCounterPort,
};
pub use use_cases::{
    estimate::BudgetEstimator,
    fetch::{FetchError, RetryingFetcher},
    fill_form::{FillFormError, FillFormInput, FillFormUseCase, FilledForm},
    generate_questions::{GenerateQuestionsError, GenerateQuestionsUseCase},
    retrieve_contexts::RetrieveContextsUseCase,
    split_generate::{SplitError, SplitGenerateUseCase},
};
