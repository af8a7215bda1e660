//! Template document value objects.
//!
//! A [`TemplateDocument`] is the blank application form attached to each
//! generation call so the model can mirror its structure.

use serde::{Deserialize, Serialize};

/// Document formats the pipeline moves between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Docx,
    Markdown,
    Plain,
}

impl DocumentFormat {
    /// Short format name understood by document converters.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFormat::Docx => "docx",
            DocumentFormat::Markdown => "markdown",
            DocumentFormat::Plain => "plain",
        }
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A form template as attached to a generation call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateDocument {
    /// Display name shown to the model for the attachment
    pub name: String,
    pub format: DocumentFormat,
    pub bytes: Vec<u8>,
}

impl TemplateDocument {
    pub fn new(name: impl Into<String>, format: DocumentFormat, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            format,
            bytes,
        }
    }

    /// Convenience constructor for the common docx template case.
    pub fn docx(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::new(name, DocumentFormat::Docx, bytes)
    }
}
