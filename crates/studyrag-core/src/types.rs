//! Domain types shared by the retrievers, the index and the answer builder.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

pub type ChunkId = String;

/// A contiguous slice of a document's normalized text, the atomic unit of
/// retrieval.
///
/// - `chunk_id`: `<slug(source)>-p<page>-c<seq>` with a 3-digit, per-page
///   sequence; unique within a corpus generation
/// - `source`: display name of the originating document (not unique)
/// - `page`: 1-based page number, `None` when paging is unknown
/// - `text`: trimmed chunk content, non-empty for any retained chunk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub chunk_id: ChunkId,
    pub source: String,
    pub page: Option<u32>,
    pub text: String,
}

/// Per-chunk metadata handed to the retrievers at build time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkMeta {
    pub chunk_id: ChunkId,
    pub source: String,
    pub page: Option<u32>,
}

/// A ranked hit as produced by a retriever, before citation decoration.
///
/// `score` semantics depend on the retriever: keyword overlap counts for
/// the lexical retriever, cosine similarity in [0, 1] for TF-IDF. Scores
/// are not comparable across retrievers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedChunk {
    pub chunk_id: ChunkId,
    pub source: String,
    pub page: Option<u32>,
    pub text: String,
    pub score: f32,
}

/// A retrieved chunk enriched with its citation string, the flat field set
/// any presentation layer needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evidence {
    pub chunk_id: ChunkId,
    pub source: String,
    pub page: Option<u32>,
    pub text: String,
    pub score: f32,
    pub citation: String,
}

/// One chunk of a document as exposed by the corpus explorer, citation
/// attached but score-free.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChunkView {
    pub chunk_id: ChunkId,
    pub source: String,
    pub page: Option<u32>,
    pub text: String,
    pub citation: String,
}

/// Per-page plain text of one uploaded document, as produced by the PDF
/// extractor. Always holds at least one page; an unextractable document
/// carries a single empty string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentText {
    pub name: String,
    pub pages: Vec<String>,
}

impl DocumentText {
    pub fn new(name: impl Into<String>, pages: Vec<String>) -> Self {
        let mut pages = pages;
        if pages.is_empty() {
            pages.push(String::new());
        }
        Self { name: name.into(), pages }
    }
}

/// Which ranking strategy a search should use.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum RetrievalMethod {
    LexicalOverlap,
    TfidfCosine,
}

impl RetrievalMethod {
    /// Short label used when printing scores ("overlap" vs "cosine").
    pub fn score_label(self) -> &'static str {
        match self {
            RetrievalMethod::LexicalOverlap => "overlap",
            RetrievalMethod::TfidfCosine => "cosine",
        }
    }
}

impl fmt::Display for RetrievalMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetrievalMethod::LexicalOverlap => write!(f, "lexical-overlap"),
            RetrievalMethod::TfidfCosine => write!(f, "tfidf-cosine"),
        }
    }
}

impl FromStr for RetrievalMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lexical-overlap" => Ok(RetrievalMethod::LexicalOverlap),
            "tfidf-cosine" => Ok(RetrievalMethod::TfidfCosine),
            other => Err(Error::InvalidConfig(format!(
                "unknown retrieval method '{other}' (expected 'lexical-overlap' or 'tfidf-cosine')"
            ))),
        }
    }
}

/// Corpus-level counters reported by `RagIndex::stats`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IndexStats {
    pub documents: usize,
    pub chunks: usize,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}
