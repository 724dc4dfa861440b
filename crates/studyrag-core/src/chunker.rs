//! Sliding-window chunking of page text.
//!
//! Chunks are fixed-size character windows with configurable overlap over
//! whitespace-normalized text. Identifiers encode source, page and a
//! per-page sequence so every chunk can be cited back to its origin.

/// Collapse all whitespace runs to single spaces and trim the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split `text` into overlapping windows of `size` characters.
///
/// The window advances by `max(1, size - overlap)` characters, so
/// `overlap >= size` degrades to maximal near-duplicate chunking instead
/// of looping forever. `size == 0` returns the whole normalized text as a
/// single chunk. Windows whose trimmed content is empty are skipped; the
/// final partial window is emitted once.
pub fn chunk_text(text: &str, size: usize, overlap: usize) -> Vec<String> {
    let normalized = normalize_whitespace(text);
    if normalized.is_empty() {
        return Vec::new();
    }
    if size == 0 {
        return vec![normalized];
    }

    let chars: Vec<char> = normalized.chars().collect();
    let step = std::cmp::max(1, size.saturating_sub(overlap));
    let mut chunks = Vec::new();
    let mut start = 0;
    loop {
        let end = std::cmp::min(chars.len(), start + size);
        let window: String = chars[start..end].iter().collect();
        if !window.trim().is_empty() {
            chunks.push(window);
        }
        if end >= chars.len() {
            break;
        }
        start += step;
    }
    chunks
}

/// Lowercased identifier-safe form of a document name: every run of
/// non-alphanumeric characters becomes a single hyphen, leading and
/// trailing hyphens are dropped.
pub fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_hyphen = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(ch.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    out
}

/// Stable chunk identifier: `<slug(source)>-p<page>-c<3-digit seq>`.
pub fn chunk_id(source: &str, page: u32, seq: usize) -> String {
    format!("{}-p{}-c{:03}", slug(source), page, seq)
}
