//! Bedrock generation adapter
//!
//! Implements [`GenerationPort`] over the Converse API. Each call is
//! stateless: the form template is attached as a document block next to
//! the prompt text, with the writing instructions as the system prompt.

use super::BedrockConfig;
use super::types;
use async_trait::async_trait;
use aws_sdk_bedrockruntime::Client as BedrockClient;
use aws_sdk_bedrockruntime::primitives::Blob;
use aws_sdk_bedrockruntime::types as bedrock;
use formpilot_application::{GenerationError, GenerationPort};
use formpilot_domain::TemplateDocument;
use std::sync::Arc;
use tracing::debug;

pub struct BedrockGenerator {
    client: Arc<BedrockClient>,
    model_id: String,
}

impl BedrockGenerator {
    /// Create a new generator for the configured model.
    pub async fn new(config: &BedrockConfig) -> Self {
        let sdk_config = config.sdk_config().await;
        Self {
            client: Arc::new(BedrockClient::new(&sdk_config)),
            model_id: config.model_id.clone(),
        }
    }

    fn document_block(template: &TemplateDocument) -> Result<bedrock::ContentBlock, GenerationError> {
        let document = bedrock::DocumentBlock::builder()
            .format(types::to_bedrock_document_format(template.format))
            .name(&template.name)
            .source(bedrock::DocumentSource::Bytes(Blob::new(
                template.bytes.clone(),
            )))
            .build()
            .map_err(|e| GenerationError::Failed(format!("Failed to build document block: {e}")))?;
        Ok(bedrock::ContentBlock::Document(document))
    }
}

#[async_trait]
impl GenerationPort for BedrockGenerator {
    async fn generate(
        &self,
        template: &TemplateDocument,
        prompt: &str,
        system: &str,
        max_output_tokens: usize,
    ) -> Result<String, GenerationError> {
        let mut content = vec![Self::document_block(template)?];
        if !prompt.is_empty() {
            content.push(bedrock::ContentBlock::Text(prompt.to_string()));
        }

        let message = bedrock::Message::builder()
            .role(bedrock::ConversationRole::User)
            .set_content(Some(content))
            .build()
            .map_err(|e| GenerationError::Failed(format!("Failed to build message: {e}")))?;

        debug!(
            model = %self.model_id,
            prompt_bytes = prompt.len(),
            max_output_tokens,
            "Calling Bedrock Converse API"
        );

        let response = self
            .client
            .converse()
            .model_id(&self.model_id)
            .messages(message)
            .system(bedrock::SystemContentBlock::Text(system.to_string()))
            .inference_config(
                bedrock::InferenceConfiguration::builder()
                    .max_tokens(max_output_tokens as i32)
                    .build(),
            )
            .send()
            .await
            .map_err(|e| types::convert_converse_error(&e))?;

        let output = response
            .output()
            .ok_or_else(|| GenerationError::Failed("No output in Bedrock response".to_string()))?;

        let text = match output {
            bedrock::ConverseOutput::Message(message) => message
                .content()
                .iter()
                .filter_map(|block| match block {
                    bedrock::ContentBlock::Text(text) => Some(text.as_str()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join(""),
            _ => String::new(),
        };

        Ok(text)
    }
}
