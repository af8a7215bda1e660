//! Type conversions between the AWS Bedrock SDKs and application types.
//!
//! Maps SDK errors onto the application's tagged error kinds and builds
//! the retrieval filter / document attachment request structures.

use aws_sdk_bedrockagentruntime::operation::retrieve::RetrieveError;
use aws_sdk_bedrockagentruntime::types as agent;
use aws_sdk_bedrockruntime::operation::converse::ConverseError;
use aws_sdk_bedrockruntime::types as bedrock;
use aws_smithy_types::Document;
use formpilot_application::{
    FilterValue, GenerationError, RetrievalError, RetrievalFilter,
};
use formpilot_domain::DocumentFormat;

// ─── Application → Bedrock ───────────────────────────────────────

/// Convert one filter value to a smithy Document.
pub fn filter_value_to_document(value: &FilterValue) -> Document {
    match value {
        FilterValue::Str(s) => Document::String(s.clone()),
        FilterValue::Int(i) => Document::Number(aws_smithy_types::Number::NegInt(*i)),
    }
}

/// Build the knowledge-base metadata filter from the equality clauses.
///
/// One clause becomes a bare `equals`; several are combined with
/// `andAll`. Returns `Ok(None)` for an empty filter. A filter that
/// cannot be built is an error, never a silently unfiltered query.
pub fn build_retrieval_filter(
    filter: &RetrievalFilter,
) -> Result<Option<agent::RetrievalFilter>, RetrievalError> {
    let mut clauses = Vec::with_capacity(filter.clauses.len());
    for (key, value) in &filter.clauses {
        let attribute = agent::FilterAttribute::builder()
            .key(key)
            .value(filter_value_to_document(value))
            .build()
            .map_err(|e| RetrievalError::Backend(format!("Failed to build filter: {e}")))?;
        clauses.push(agent::RetrievalFilter::Equals(attribute));
    }

    Ok(match clauses.len() {
        0 => None,
        1 => clauses.pop(),
        _ => Some(agent::RetrievalFilter::AndAll(clauses)),
    })
}

/// Convert a domain document format to the Converse attachment format.
pub fn to_bedrock_document_format(format: DocumentFormat) -> bedrock::DocumentFormat {
    match format {
        DocumentFormat::Docx => bedrock::DocumentFormat::Docx,
        DocumentFormat::Markdown => bedrock::DocumentFormat::Md,
        DocumentFormat::Plain => bedrock::DocumentFormat::Txt,
    }
}

// ─── Bedrock → Application ───────────────────────────────────────

/// Convert a Retrieve SDK error to a RetrievalError.
pub fn convert_retrieve_error(
    err: &aws_sdk_bedrockagentruntime::error::SdkError<RetrieveError>,
) -> RetrievalError {
    match err {
        aws_sdk_bedrockagentruntime::error::SdkError::ServiceError(service_err) => {
            match service_err.err() {
                RetrieveError::ThrottlingException(e) => {
                    RetrievalError::RateLimited(format!("Knowledge base throttled: {e}"))
                }
                other => RetrievalError::Backend(format!("Knowledge base error: {other:?}")),
            }
        }
        other => RetrievalError::Backend(format!("Bedrock SDK error: {other}")),
    }
}

/// Convert a Converse SDK error to a GenerationError.
///
/// ValidationException is the backend's rejection of an oversized
/// request and maps to the budget-exceeded kind.
pub fn convert_converse_error(
    err: &aws_sdk_bedrockruntime::error::SdkError<ConverseError>,
) -> GenerationError {
    match err {
        aws_sdk_bedrockruntime::error::SdkError::ServiceError(service_err) => {
            match service_err.err() {
                ConverseError::ValidationException(e) => {
                    GenerationError::InputTooLarge(format!("Bedrock validation error: {e}"))
                }
                ConverseError::ThrottlingException(e) => {
                    GenerationError::RateLimited(format!("Bedrock throttled: {e}"))
                }
                other => GenerationError::Failed(format!("Bedrock error: {other:?}")),
            }
        }
        other => GenerationError::Failed(format!("Bedrock SDK error: {other}")),
    }
}
