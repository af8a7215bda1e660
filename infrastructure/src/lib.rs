//! Infrastructure layer for formpilot
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: AWS Bedrock retrieval and generation, S3 and
//! local-directory object stores, the pandoc document converter, the
//! tiktoken token counter, and configuration file loading.

pub mod bedrock;
pub mod config;
pub mod convert;
pub mod store;
pub mod tokens;

// Re-export commonly used types
pub use bedrock::{BedrockConfig, BedrockGenerator, KnowledgeBaseRetriever};
pub use config::{ConfigLoader, FileConfig, PipelineConfig, StoreConfig};
pub use convert::PandocConverter;
pub use store::{LocalObjectStore, S3ObjectStore};
pub use tokens::TiktokenCounter;
