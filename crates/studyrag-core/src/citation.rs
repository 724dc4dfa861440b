//! Canonical citation strings.
//!
//! The format is stable and reproduced by downstream reports, so the
//! middle dot is a literal bullet character, never a hyphen.

/// Render a `(source, page, chunk_id)` triple as a citation.
///
/// `[{source} • p.{page} • {chunk_id}]` when the page is known,
/// `[{source} • {chunk_id}]` otherwise.
pub fn make_citation(source: &str, page: Option<u32>, chunk_id: &str) -> String {
    match page {
        Some(p) => format!("[{source} • p.{p} • {chunk_id}]"),
        None => format!("[{source} • {chunk_id}]"),
    }
}

/// Compact source label for ranking panels: `"{source} (p.{page})"`, or the
/// bare source when paging is unknown.
pub fn pretty_source(source: &str, page: Option<u32>) -> String {
    match page {
        Some(p) => format!("{source} (p.{p})"),
        None => source.to_string(),
    }
}
