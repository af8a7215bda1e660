//! AWS Bedrock adapters
//!
//! - [`KnowledgeBaseRetriever`] — knowledge-base vector retrieval over
//!   the Bedrock Agent Runtime
//! - [`BedrockGenerator`] — one Converse API invocation with the form
//!   template attached as a document block

mod generation;
mod retrieval;
pub mod types;

pub use generation::BedrockGenerator;
pub use retrieval::KnowledgeBaseRetriever;

use serde::{Deserialize, Serialize};

/// Connection settings shared by the Bedrock adapters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BedrockConfig {
    /// AWS region the clients are created in
    pub region: String,
    /// Optional named AWS profile
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    /// Model id used for generation calls
    pub model_id: String,
    /// Knowledge base id used for retrieval
    pub knowledge_base_id: String,
}

impl Default for BedrockConfig {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            profile: None,
            model_id: "us.anthropic.claude-sonnet-4-5-20250929-v1:0".to_string(),
            knowledge_base_id: String::new(),
        }
    }
}

impl BedrockConfig {
    /// Load the AWS SDK configuration for these settings.
    pub async fn sdk_config(&self) -> aws_config::SdkConfig {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(self.region.clone()));

        if let Some(ref profile) = self.profile {
            loader = loader.profile_name(profile);
        }

        loader.load().await
    }
}
