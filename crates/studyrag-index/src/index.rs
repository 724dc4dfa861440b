//! In-memory index over one generation of uploaded documents.
//!
//! Lifecycle is an explicit state machine: EMPTY → LOADED (`add_documents`)
//! → BUILT (`build`). Searching before `build` is the one workflow-halting
//! error; everything else degrades to smaller-but-valid results. A rebuild
//! always replaces the whole chunk list, never patches it, so chunk ids
//! stay deterministic within a generation.

use std::collections::BTreeSet;

use studyrag_core::chunker::{chunk_id, chunk_text};
use studyrag_core::citation::make_citation;
use studyrag_core::error::{Error, Result};
use studyrag_core::traits::Retriever;
use studyrag_core::types::{
    Chunk, ChunkMeta, DocumentChunkView, DocumentText, Evidence, IndexStats, RetrievalMethod,
    RetrievedChunk,
};
use studyrag_retrieve::{KeywordRetriever, TfidfRetriever};

/// Where the index is in its accumulate-then-build lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexState {
    Empty,
    Loaded,
    Built,
}

struct BuiltRetrievers {
    keyword: KeywordRetriever,
    tfidf: TfidfRetriever,
}

/// A small, research-oriented index:
/// - chunks per-page document text with overlap (so page numbers are citable)
/// - provides two retrieval baselines: keyword overlap and TF-IDF cosine
pub struct RagIndex {
    chunk_size: usize,
    chunk_overlap: usize,
    chunks: Vec<Chunk>,
    docs: Vec<String>,
    retrievers: Option<BuiltRetrievers>,
}

impl RagIndex {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
            chunks: Vec::new(),
            docs: Vec::new(),
            retrievers: None,
        }
    }

    pub fn state(&self) -> IndexState {
        if self.retrievers.is_some() {
            IndexState::Built
        } else if self.chunks.is_empty() && self.docs.is_empty() {
            IndexState::Empty
        } else {
            IndexState::Loaded
        }
    }

    /// Replace the pending chunk list with chunks built from `documents`.
    ///
    /// Chunks are made per page so page numbers can be cited; the chunk
    /// sequence restarts at 1 on every page. Any previously built
    /// retrievers are dropped, so a new `build` is required before
    /// searching again.
    pub fn add_documents(&mut self, documents: Vec<DocumentText>) {
        self.chunks.clear();
        self.docs.clear();
        self.retrievers = None;
        for doc in documents {
            self.docs.push(doc.name.clone());
            for (page_idx, page_text) in doc.pages.iter().enumerate() {
                let page = (page_idx + 1) as u32;
                for (seq, window) in chunk_text(page_text, self.chunk_size, self.chunk_overlap)
                    .into_iter()
                    .enumerate()
                {
                    self.chunks.push(Chunk {
                        chunk_id: chunk_id(&doc.name, page, seq + 1),
                        source: doc.name.clone(),
                        page: Some(page),
                        text: window.trim().to_string(),
                    });
                }
            }
        }
        tracing::debug!(
            documents = self.docs.len(),
            chunks = self.chunks.len(),
            "replaced pending chunk list"
        );
    }

    /// Freeze the current chunk list and construct both retrievers over it.
    ///
    /// Idempotent: re-invoking rebuilds both retrievers from the current
    /// chunks without a fresh `add_documents`.
    pub fn build(&mut self) {
        let texts: Vec<String> = self.chunks.iter().map(|c| c.text.clone()).collect();
        let metas: Vec<ChunkMeta> = self
            .chunks
            .iter()
            .map(|c| ChunkMeta {
                chunk_id: c.chunk_id.clone(),
                source: c.source.clone(),
                page: c.page,
            })
            .collect();

        let keyword = KeywordRetriever::new(texts.clone(), metas.clone());
        let tfidf = TfidfRetriever::new(texts, metas);
        if tfidf.is_degraded() {
            tracing::debug!("statistical retriever degraded to keyword overlap");
        }
        self.retrievers = Some(BuiltRetrievers { keyword, tfidf });
    }

    /// Ranked, citation-decorated evidence for `query`.
    ///
    /// Fails with [`Error::NotBuilt`] unless `build` has run since the last
    /// `add_documents`.
    pub fn search(
        &self,
        query: &str,
        top_k: usize,
        method: RetrievalMethod,
    ) -> Result<Vec<Evidence>> {
        let retrievers = self.retrievers.as_ref().ok_or(Error::NotBuilt)?;
        let hits = match method {
            RetrievalMethod::LexicalOverlap => retrievers.keyword.search(query, top_k),
            RetrievalMethod::TfidfCosine => retrievers.tfidf.search(query, top_k),
        };
        Ok(hits.into_iter().map(decorate).collect())
    }

    pub fn stats(&self) -> IndexStats {
        let distinct: BTreeSet<&str> = self.docs.iter().map(String::as_str).collect();
        IndexStats {
            documents: distinct.len(),
            chunks: self.chunks.len(),
            chunk_size: self.chunk_size,
            chunk_overlap: self.chunk_overlap,
        }
    }

    /// Distinct source names, sorted lexicographically (case-sensitive).
    pub fn list_documents(&self) -> Vec<String> {
        let distinct: BTreeSet<&str> = self.docs.iter().map(String::as_str).collect();
        distinct.into_iter().map(str::to_string).collect()
    }

    /// All chunks of one source document, each with its citation attached.
    pub fn get_chunks_for_document(&self, doc_name: &str) -> Vec<DocumentChunkView> {
        self.chunks
            .iter()
            .filter(|c| c.source == doc_name)
            .map(|c| DocumentChunkView {
                chunk_id: c.chunk_id.clone(),
                source: c.source.clone(),
                page: c.page,
                text: c.text.clone(),
                citation: make_citation(&c.source, c.page, &c.chunk_id),
            })
            .collect()
    }
}

fn decorate(hit: RetrievedChunk) -> Evidence {
    let citation = make_citation(&hit.source, hit.page, &hit.chunk_id);
    Evidence {
        chunk_id: hit.chunk_id,
        source: hit.source,
        page: hit.page,
        text: hit.text,
        score: hit.score,
        citation,
    }
}
