//! studyrag-pdf
//!
//! Per-page PDF text extraction. The contract is deliberately forgiving:
//! the result always holds at least one page, and a document that cannot
//! be read at all yields a single empty page instead of an error, so
//! indexing never fails on unreadable input. The gap stays visible as a
//! document with zero chunks.
//!
//! Extraction is layered: `lopdf` gives page-accurate text (so chunks can
//! cite page numbers); if the document cannot be parsed that way, a
//! whole-document pass via `pdf-extract` produces a single page.

use std::path::Path;

use anyhow::{Context, Result};
use lopdf::Document;

use studyrag_core::types::DocumentText;

/// Extract per-page plain text from PDF bytes. Never fails and never
/// returns an empty Vec.
pub fn extract_pdf_pages(bytes: &[u8]) -> Vec<String> {
    match extract_per_page(bytes) {
        Ok(pages) if !pages.is_empty() => pages,
        Ok(_) => vec![String::new()],
        Err(e) => {
            tracing::warn!("per-page PDF extraction failed: {e}");
            match extract_whole_document(bytes) {
                Ok(text) => vec![text],
                Err(e) => {
                    tracing::warn!("whole-document PDF extraction failed: {e}");
                    vec![String::new()]
                }
            }
        }
    }
}

/// Read a PDF from disk and extract its pages; the document name is the
/// file name as displayed to the user.
pub fn read_pdf_file(path: &Path) -> Result<DocumentText> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    let bytes =
        std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(DocumentText::new(name, extract_pdf_pages(&bytes)))
}

fn extract_per_page(bytes: &[u8]) -> Result<Vec<String>> {
    let doc = Document::load_mem(bytes).context("parsing PDF")?;
    let mut pages = Vec::new();
    for (page_no, _) in doc.get_pages() {
        // A page that fails to decode becomes an empty page, not an error.
        let text = doc.extract_text(&[page_no]).unwrap_or_default();
        pages.push(text);
    }
    Ok(pages)
}

fn extract_whole_document(bytes: &[u8]) -> Result<String> {
    pdf_extract::extract_text_from_mem(bytes).context("extracting whole document")
}
