//! PDF extraction: Poppler's `pdftotext`, located on `PATH` at construction time.

mod error;
pub use error::ExtractError;

mod poppler;
pub use poppler::PdfExtractor;
