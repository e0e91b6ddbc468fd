//! Document loading for `classify --file`.

use std::path::Path;

use anyhow::Context;
use lexclause_extract::PdfExtractor;

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Read a document as text. `.pdf` files go through the extractor; anything
/// else must be UTF-8.
pub fn read_document(path: &Path, extractor: &PdfExtractor) -> anyhow::Result<String> {
    if is_pdf(path) {
        tracing::info!(path = %path.display(), "processing PDF file");
        return extractor
            .extract_path(path)
            .with_context(|| format!("processing PDF {}", path.display()));
    }

    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}
