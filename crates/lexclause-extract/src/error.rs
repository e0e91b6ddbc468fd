use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    /// No extraction backend is installed.
    #[error("PDF support requires Poppler's pdftotext on PATH")]
    Unsupported,

    #[error("PDF file not found: {0}")]
    FileNotFound(std::path::PathBuf),

    #[error("PDF is encrypted or password-protected: {0}")]
    Encrypted(std::path::PathBuf),

    #[error("Error extracting text from PDF: {0}")]
    Failed(String),

    #[error("No text could be extracted from the PDF file")]
    NoText,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExtractError {
    /// True when the capability is missing, as opposed to this document failing.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported)
    }
}
