//! On-disk configuration shape.
//!
//! Mirrors the sections of `formpilot.toml`:
//!
//! ```toml
//! [bedrock]
//! region = "us-east-1"
//! model_id = "us.anthropic.claude-sonnet-4-5-20250929-v1:0"
//! knowledge_base_id = "ABCDEF1234"
//!
//! [pipeline]
//! max_retrieval_workers = 15
//! max_split = 4
//!
//! [store]
//! docs_bucket = "grant-docs"
//! filled_bucket = "grant-filled"
//! ```

use crate::bedrock::BedrockConfig;
use formpilot_application::FillParams;
use formpilot_domain::TokenBudget;
use serde::{Deserialize, Serialize};

/// Pipeline tuning section, merged into [`FillParams`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub max_retrieval_workers: usize,
    pub max_generation_workers: usize,
    pub max_retries: usize,
    pub results_per_query: usize,
    pub max_split: usize,
    pub max_input_tokens: usize,
    pub max_output_tokens: usize,
    pub partial_output_tokens: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let params = FillParams::default();
        Self {
            max_retrieval_workers: params.max_retrieval_workers,
            max_generation_workers: params.max_generation_workers,
            max_retries: params.max_retries,
            results_per_query: params.results_per_query,
            max_split: params.max_split,
            max_input_tokens: params.token_budget.max_input_tokens(),
            max_output_tokens: params.token_budget.max_output_tokens(),
            partial_output_tokens: params.token_budget.partial_output_tokens(),
        }
    }
}

impl PipelineConfig {
    /// Convert the flat file section into pipeline parameters.
    pub fn to_fill_params(&self) -> FillParams {
        FillParams {
            max_retrieval_workers: self.max_retrieval_workers,
            max_generation_workers: self.max_generation_workers,
            max_retries: self.max_retries,
            results_per_query: self.results_per_query,
            max_split: self.max_split,
            token_budget: TokenBudget::new(
                self.max_input_tokens,
                self.max_output_tokens,
                self.partial_output_tokens,
            ),
        }
    }
}

/// Artifact storage section
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Bucket holding templates, question sets, and prompts
    pub docs_bucket: String,
    /// Bucket receiving completed forms
    pub filled_bucket: String,
    /// When set, artifacts live under this directory instead of S3
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_root: Option<String>,
}

/// Complete file configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub bedrock: BedrockConfig,
    pub pipeline: PipelineConfig,
    pub store: StoreConfig,
}

impl FileConfig {
    /// Validate the merged configuration, returning a list of issues.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = self.pipeline.to_fill_params().validate();
        if self.bedrock.knowledge_base_id.is_empty() {
            issues.push("bedrock: knowledge_base_id is required".to_string());
        }
        if self.store.local_root.is_none() {
            if self.store.docs_bucket.is_empty() {
                issues.push("store: docs_bucket is required without local_root".to_string());
            }
            if self.store.filled_bucket.is_empty() {
                issues.push("store: filled_bucket is required without local_root".to_string());
            }
        }
        issues
    }
}
