use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info, warn};

use crate::ExtractError;

/// Text extraction through Poppler's `pdftotext`.
///
/// Capability is fixed when the extractor is built: [`detect`](Self::detect)
/// looks the binary up on `PATH` once, and every later call without a binary
/// returns [`ExtractError::Unsupported`].
#[derive(Debug, Clone)]
pub struct PdfExtractor {
    binary: Option<PathBuf>,
}

impl PdfExtractor {
    /// Locate `pdftotext` on `PATH`.
    pub fn detect() -> Self {
        let binary = which::which("pdftotext").ok();
        match &binary {
            Some(path) => debug!(path = %path.display(), "found pdftotext"),
            None => warn!("pdftotext not found, PDF input disabled"),
        }
        Self { binary }
    }

    /// Use a specific `pdftotext`-compatible executable.
    pub fn with_binary(path: impl Into<PathBuf>) -> Self {
        Self {
            binary: Some(path.into()),
        }
    }

    /// An extractor that rejects every document.
    pub fn unavailable() -> Self {
        Self { binary: None }
    }

    pub fn is_available(&self) -> bool {
        self.binary.is_some()
    }

    /// Extract text from a PDF on disk. Page breaks become blank lines.
    pub fn extract_path(&self, path: &Path) -> Result<String, ExtractError> {
        let binary = self.binary.as_ref().ok_or(ExtractError::Unsupported)?;
        if !path.exists() {
            return Err(ExtractError::FileNotFound(path.to_path_buf()));
        }

        info!(path = %path.display(), "extracting text from PDF");
        let out = Command::new(binary).arg("-q").arg(path).arg("-").output()?;
        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            let lower = stderr.to_lowercase();
            if lower.contains("encrypt") || lower.contains("password") {
                return Err(ExtractError::Encrypted(path.to_path_buf()));
            }
            let detail = match stderr.trim() {
                "" => format!("pdftotext exited with {}", out.status),
                msg => msg.to_string(),
            };
            return Err(ExtractError::Failed(detail));
        }

        let text = String::from_utf8_lossy(&out.stdout).replace('\u{000C}', "\n\n");
        if text.trim().is_empty() {
            warn!(path = %path.display(), "no text could be extracted from the PDF");
            return Err(ExtractError::NoText);
        }

        info!(chars = text.chars().count(), "extracted text from PDF");
        debug!(head = %text.chars().take(200).collect::<String>(), "extracted text preview");
        Ok(text)
    }

    /// Extract text from in-memory PDF bytes.
    ///
    /// The bytes are staged in a temporary `.pdf` file that is removed when this
    /// call returns, whether extraction succeeded or not.
    pub fn extract_bytes(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        if !self.is_available() {
            return Err(ExtractError::Unsupported);
        }

        let mut staged = tempfile::Builder::new()
            .prefix("lexclause-")
            .suffix(".pdf")
            .tempfile()?;
        staged.write_all(bytes)?;
        staged.flush()?;

        self.extract_path(staged.path())
    }
}
