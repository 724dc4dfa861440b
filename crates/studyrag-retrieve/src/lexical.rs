//! Keyword-overlap baseline: no term weighting, no BM25.

use std::collections::HashSet;

use studyrag_core::tokenize::token_set;
use studyrag_core::traits::Retriever;
use studyrag_core::types::{ChunkMeta, RetrievedChunk};

/// Ranks chunks by the number of distinct query terms they share with the
/// query. A term appearing ten times in a chunk scores the same as one
/// appearing once; chunks sharing no term are never returned.
pub struct KeywordRetriever {
    texts: Vec<String>,
    metas: Vec<ChunkMeta>,
    tokens: Vec<HashSet<String>>,
}

impl KeywordRetriever {
    pub fn new(texts: Vec<String>, metas: Vec<ChunkMeta>) -> Self {
        debug_assert_eq!(texts.len(), metas.len());
        let tokens = texts.iter().map(|t| token_set(t)).collect();
        Self { texts, metas, tokens }
    }

    fn hit(&self, index: usize, score: f32) -> RetrievedChunk {
        let meta = &self.metas[index];
        RetrievedChunk {
            chunk_id: meta.chunk_id.clone(),
            source: meta.source.clone(),
            page: meta.page,
            text: self.texts[index].clone(),
            score,
        }
    }
}

impl Retriever for KeywordRetriever {
    fn search(&self, query: &str, top_k: usize) -> Vec<RetrievedChunk> {
        let q = token_set(query);
        let mut scored: Vec<(f32, usize)> = Vec::new();
        for (i, toks) in self.tokens.iter().enumerate() {
            let overlap = q.intersection(toks).count();
            if overlap == 0 {
                continue;
            }
            scored.push((overlap as f32, i));
        }
        // Stable sort keeps corpus order among equal scores.
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored
            .into_iter()
            .take(top_k)
            .map(|(score, i)| self.hit(i, score))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(id: &str) -> ChunkMeta {
        ChunkMeta {
            chunk_id: id.to_string(),
            source: "doc.pdf".to_string(),
            page: Some(1),
        }
    }

    #[test]
    fn scores_count_distinct_shared_terms() {
        let retriever = KeywordRetriever::new(
            vec![
                "A holomorphic function on a domain".to_string(),
                "Measure theory and integration".to_string(),
            ],
            vec![meta("a"), meta("b")],
        );
        let hits = retriever.search("holomorphic function", 5);
        assert_eq!(hits.len(), 1, "zero-overlap chunk never appears");
        assert_eq!(hits[0].chunk_id, "a");
        assert_eq!(hits[0].score, 2.0);
    }
}
