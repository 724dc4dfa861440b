//! TF-IDF cosine-similarity ranking with a keyword-overlap fallback.
//!
//! The vector space uses unigrams and bigrams over stop-word-filtered,
//! case-folded tokens, smoothed idf weights and L2-normalized rows, so a
//! cosine score is a plain sparse dot product in [0, 1]. If the model
//! cannot be fitted (an empty vocabulary, e.g. an all-stop-word corpus),
//! the retriever degrades to keyword overlap over the same corpus; the
//! fallback is decided once at construction and is invisible to callers.

use std::collections::{HashMap, HashSet};

use anyhow::{bail, Result};

use studyrag_core::tokenize::tokenize;
use studyrag_core::traits::Retriever;
use studyrag_core::types::{ChunkMeta, RetrievedChunk};

use crate::lexical::KeywordRetriever;

/// Vocabulary cap; when exceeded, the most frequent terms win.
pub const MAX_FEATURES: usize = 150_000;

/// English stop words removed before forming unigrams and bigrams.
const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is", "it",
    "its", "of", "on", "that", "the", "to", "was", "will", "with", "or", "but", "not", "this",
    "these", "they", "them", "their", "there", "then", "than", "so", "if", "when", "where", "why",
    "how", "what", "which", "who", "whom", "whose", "can", "could", "should", "would", "may",
    "might", "must", "shall", "do", "does", "did", "have", "had", "having",
];

/// Fitted TF-IDF vector space over one chunk corpus.
struct TfidfModel {
    vocab: HashMap<String, usize>,
    idf: Vec<f32>,
    /// One L2-normalized sparse row per chunk, entries sorted by term index.
    rows: Vec<Vec<(usize, f32)>>,
}

impl TfidfModel {
    fn fit(texts: &[String]) -> Result<Self> {
        let docs: Vec<Vec<String>> = texts.iter().map(|t| features(t)).collect();

        // Document frequency and corpus-wide frequency per candidate term.
        let mut df: HashMap<&str, usize> = HashMap::new();
        let mut total: HashMap<&str, usize> = HashMap::new();
        for doc in &docs {
            let mut seen: HashSet<&str> = HashSet::new();
            for term in doc {
                *total.entry(term).or_insert(0) += 1;
                if seen.insert(term) {
                    *df.entry(term).or_insert(0) += 1;
                }
            }
        }
        if total.is_empty() {
            bail!("empty vocabulary: no indexable terms in corpus");
        }

        // Cap the vocabulary at the most frequent terms, ties by term.
        let mut terms: Vec<(&str, usize)> = total.into_iter().collect();
        if terms.len() > MAX_FEATURES {
            terms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
            terms.truncate(MAX_FEATURES);
        }
        terms.sort_by(|a, b| a.0.cmp(b.0));

        let vocab: HashMap<String, usize> = terms
            .iter()
            .enumerate()
            .map(|(i, (term, _))| ((*term).to_string(), i))
            .collect();

        // Smoothed idf, as in scikit-learn: ln((1+n)/(1+df)) + 1.
        let n = texts.len() as f32;
        let mut idf = vec![0.0f32; vocab.len()];
        for (term, &index) in &vocab {
            let d = df.get(term.as_str()).copied().unwrap_or(0) as f32;
            idf[index] = ((1.0 + n) / (1.0 + d)).ln() + 1.0;
        }

        let model = Self { vocab, idf, rows: Vec::new() };
        let rows = docs.iter().map(|doc| model.vectorize_terms(doc)).collect();
        Ok(Self { rows, ..model })
    }

    /// Sparse, L2-normalized tf-idf vector for a bag of terms.
    fn vectorize_terms(&self, terms: &[String]) -> Vec<(usize, f32)> {
        let mut tf: HashMap<usize, f32> = HashMap::new();
        for term in terms {
            if let Some(&index) = self.vocab.get(term) {
                *tf.entry(index).or_insert(0.0) += 1.0;
            }
        }
        let mut entries: Vec<(usize, f32)> = tf
            .into_iter()
            .map(|(index, count)| (index, count * self.idf[index]))
            .collect();
        let norm: f32 = entries.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
        if norm > 0.0 {
            for (_, w) in &mut entries {
                *w /= norm;
            }
        }
        entries.sort_by_key(|(index, _)| *index);
        entries
    }

    /// Cosine similarity of the query against every chunk row.
    fn similarities(&self, query: &str) -> Vec<f32> {
        let q = self.vectorize_terms(&features(query));
        let q_map: HashMap<usize, f32> = q.into_iter().collect();
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .filter_map(|(index, w)| q_map.get(index).map(|qw| qw * w))
                    .sum()
            })
            .collect()
    }
}

/// Unigrams plus adjacent bigrams over stop-word-filtered tokens; bigram
/// terms are the two tokens joined with a single space.
fn features(text: &str) -> Vec<String> {
    let kept: Vec<String> = tokenize(text)
        .into_iter()
        .filter(|t| !STOP_WORDS.contains(&t.as_str()))
        .collect();
    let mut out = kept.clone();
    for pair in kept.windows(2) {
        out.push(format!("{} {}", pair[0], pair[1]));
    }
    out
}

enum Backend {
    Model(TfidfModel),
    Fallback(KeywordRetriever),
}

/// TF-IDF cosine retriever over a frozen chunk corpus.
///
/// Construction never fails: when the model cannot be fitted the retriever
/// silently degrades to [`KeywordRetriever`] with identical result shape
/// and `top_k` semantics.
pub struct TfidfRetriever {
    texts: Vec<String>,
    metas: Vec<ChunkMeta>,
    backend: Backend,
}

impl TfidfRetriever {
    pub fn new(texts: Vec<String>, metas: Vec<ChunkMeta>) -> Self {
        debug_assert_eq!(texts.len(), metas.len());
        let backend = match TfidfModel::fit(&texts) {
            Ok(model) => Backend::Model(model),
            Err(e) => {
                tracing::warn!("TF-IDF unavailable, falling back to keyword overlap: {e}");
                Backend::Fallback(KeywordRetriever::new(texts.clone(), metas.clone()))
            }
        };
        Self { texts, metas, backend }
    }

    /// Force the keyword-overlap fallback, regardless of the corpus.
    pub fn degraded(texts: Vec<String>, metas: Vec<ChunkMeta>) -> Self {
        let backend = Backend::Fallback(KeywordRetriever::new(texts.clone(), metas.clone()));
        Self { texts, metas, backend }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self.backend, Backend::Fallback(_))
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

impl Retriever for TfidfRetriever {
    fn search(&self, query: &str, top_k: usize) -> Vec<RetrievedChunk> {
        let model = match &self.backend {
            Backend::Model(model) => model,
            Backend::Fallback(keyword) => return keyword.search(query, top_k),
        };
        let sims = model.similarities(query);
        let mut scored: Vec<(f32, usize)> = sims
            .into_iter()
            .enumerate()
            .filter(|(_, s)| *s > 0.0)
            .map(|(i, s)| (s, i))
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored
            .into_iter()
            .take(top_k)
            .map(|(score, i)| self.hit(i, score))
            .collect()
    }
}
