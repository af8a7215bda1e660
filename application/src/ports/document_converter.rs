//! Document converter port
//!
//! Markdown ↔ document conversion and plain-text extraction for the
//! budget estimate.

use async_trait::async_trait;
use formpilot_domain::{DocumentFormat, TemplateDocument};
use thiserror::Error;

/// Errors a document converter adapter can report
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Converter unavailable: {0}")]
    Unavailable(String),

    #[error("Conversion from {from} to {to} failed: {message}")]
    Failed {
        from: DocumentFormat,
        to: DocumentFormat,
        message: String,
    },
}

/// Port for document format conversion
#[async_trait]
pub trait DocumentConverterPort: Send + Sync {
    async fn convert(
        &self,
        input: &[u8],
        from: DocumentFormat,
        to: DocumentFormat,
    ) -> Result<Vec<u8>, ConvertError>;

    /// Extract the plain text of a template document.
    async fn plain_text(&self, doc: &TemplateDocument) -> Result<String, ConvertError> {
        if doc.format == DocumentFormat::Plain {
            return Ok(String::from_utf8_lossy(&doc.bytes).into_owned());
        }
        let bytes = self
            .convert(&doc.bytes, doc.format, DocumentFormat::Plain)
            .await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
