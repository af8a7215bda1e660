//! Knowledge-base retrieval adapter
//!
//! Implements [`RetrievalPort`] over the Bedrock Agent Runtime Retrieve
//! API with vector search and an equality metadata filter.

use super::BedrockConfig;
use super::types;
use async_trait::async_trait;
use aws_sdk_bedrockagentruntime::Client as AgentClient;
use aws_sdk_bedrockagentruntime::types as agent;
use formpilot_application::{
    RetrievalError, RetrievalFilter, RetrievalPort, RetrievalResponse, RetrievedChunk,
};
use std::sync::Arc;
use tracing::debug;

pub struct KnowledgeBaseRetriever {
    client: Arc<AgentClient>,
    knowledge_base_id: String,
    results_per_query: usize,
}

impl KnowledgeBaseRetriever {
    /// Create a new retriever against the configured knowledge base.
    pub async fn new(config: &BedrockConfig, results_per_query: usize) -> Self {
        let sdk_config = config.sdk_config().await;
        Self {
            client: Arc::new(AgentClient::new(&sdk_config)),
            knowledge_base_id: config.knowledge_base_id.clone(),
            results_per_query,
        }
    }

    fn vector_search_configuration(
        &self,
        filter: &RetrievalFilter,
    ) -> Result<agent::KnowledgeBaseVectorSearchConfiguration, RetrievalError> {
        let mut builder = agent::KnowledgeBaseVectorSearchConfiguration::builder()
            .number_of_results(self.results_per_query as i32);

        if let Some(built) = types::build_retrieval_filter(filter)? {
            builder = builder.filter(built);
        }

        Ok(builder.build())
    }
}

#[async_trait]
impl RetrievalPort for KnowledgeBaseRetriever {
    async fn retrieve(
        &self,
        query: &str,
        filter: &RetrievalFilter,
    ) -> Result<RetrievalResponse, RetrievalError> {
        let retrieval_query = agent::KnowledgeBaseQuery::builder().text(query).build();

        let configuration = agent::KnowledgeBaseRetrievalConfiguration::builder()
            .vector_search_configuration(self.vector_search_configuration(filter)?)
            .build();

        debug!(
            knowledge_base = %self.knowledge_base_id,
            results = self.results_per_query,
            "Calling Bedrock Retrieve API"
        );

        let response = self
            .client
            .retrieve()
            .knowledge_base_id(&self.knowledge_base_id)
            .retrieval_query(retrieval_query)
            .retrieval_configuration(configuration)
            .send()
            .await
            .map_err(|e| types::convert_retrieve_error(&e))?;

        let chunks = response
            .retrieval_results()
            .iter()
            .filter_map(|result| {
                let text = result.content()?.text().to_string();
                let source_uri = result
                    .location()
                    .and_then(|location| location.s3_location())
                    .and_then(|s3| s3.uri())
                    .map(|uri| uri.to_string());
                Some(RetrievedChunk {
                    text,
                    source_uri,
                    score: result.score().unwrap_or(0.0),
                })
            })
            .collect();

        Ok(RetrievalResponse { chunks })
    }
}
