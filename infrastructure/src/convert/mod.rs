//! Document conversion via the pandoc CLI.
//!
//! Implements [`DocumentConverterPort`] by shelling out to a local
//! `pandoc` binary: markdown → docx for the completed form, docx →
//! plain text for the budget estimate.

use async_trait::async_trait;
use formpilot_application::{ConvertError, DocumentConverterPort};
use formpilot_domain::DocumentFormat;
use std::path::PathBuf;
use tracing::debug;

/// Pandoc-backed document converter
pub struct PandocConverter {
    binary: PathBuf,
}

impl PandocConverter {
    /// Locate pandoc on the PATH.
    pub fn new() -> Result<Self, ConvertError> {
        let binary = which::which("pandoc")
            .map_err(|e| ConvertError::Unavailable(format!("pandoc not found: {e}")))?;
        Ok(Self { binary })
    }

    /// Use an explicit pandoc binary path.
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn pandoc_format(format: DocumentFormat) -> &'static str {
        match format {
            DocumentFormat::Docx => "docx",
            DocumentFormat::Markdown => "markdown",
            DocumentFormat::Plain => "plain",
        }
    }
}

#[async_trait]
impl DocumentConverterPort for PandocConverter {
    async fn convert(
        &self,
        input: &[u8],
        from: DocumentFormat,
        to: DocumentFormat,
    ) -> Result<Vec<u8>, ConvertError> {
        // Binary formats cannot pass through stdio, so both ends go
        // through temp files.
        let workdir = tempfile::tempdir().map_err(|e| ConvertError::Failed {
            from,
            to,
            message: format!("temp dir: {e}"),
        })?;
        let input_path = workdir.path().join("input");
        let output_path = workdir.path().join("output");

        tokio::fs::write(&input_path, input)
            .await
            .map_err(|e| ConvertError::Failed {
                from,
                to,
                message: format!("write input: {e}"),
            })?;

        debug!(from = %from, to = %to, "Running pandoc");

        let status_output = tokio::process::Command::new(&self.binary)
            .arg(&input_path)
            .arg("--from")
            .arg(Self::pandoc_format(from))
            .arg("--to")
            .arg(Self::pandoc_format(to))
            .arg("-o")
            .arg(&output_path)
            .output()
            .await
            .map_err(|e| ConvertError::Failed {
                from,
                to,
                message: format!("spawn pandoc: {e}"),
            })?;

        if !status_output.status.success() {
            return Err(ConvertError::Failed {
                from,
                to,
                message: String::from_utf8_lossy(&status_output.stderr).into_owned(),
            });
        }

        tokio::fs::read(&output_path)
            .await
            .map_err(|e| ConvertError::Failed {
                from,
                to,
                message: format!("read output: {e}"),
            })
    }
}
