use studyrag_core::traits::Retriever;
use studyrag_core::types::ChunkMeta;
use studyrag_retrieve::{KeywordRetriever, TfidfRetriever};

fn corpus() -> (Vec<String>, Vec<ChunkMeta>) {
    let texts = vec![
        "A function is holomorphic on a domain when it is complex differentiable everywhere"
            .to_string(),
        "The Cauchy-Riemann equations characterize complex differentiability".to_string(),
        "Lebesgue measure assigns volume to subsets of euclidean space".to_string(),
    ];
    let metas = (0..texts.len())
        .map(|i| ChunkMeta {
            chunk_id: format!("notes-pdf-p1-c{:03}", i + 1),
            source: "notes.pdf".to_string(),
            page: Some(1),
        })
        .collect();
    (texts, metas)
}

#[test]
fn keyword_overlap_scores_shared_distinct_terms() {
    let texts = vec!["holomorphic domain".to_string()];
    let metas = vec![ChunkMeta {
        chunk_id: "a-pdf-p1-c001".to_string(),
        source: "a.pdf".to_string(),
        page: Some(1),
    }];
    let retriever = KeywordRetriever::new(texts, metas);
    let hits = retriever.search("holomorphic function", 5);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].score, 1.0);
}

#[test]
fn keyword_retriever_excludes_zero_overlap_even_when_top_k_unfilled() {
    let (texts, metas) = corpus();
    let retriever = KeywordRetriever::new(texts, metas);
    let hits = retriever.search("holomorphic", 10);
    assert_eq!(hits.len(), 1, "only the chunk sharing a term is returned");
    assert_eq!(hits[0].chunk_id, "notes-pdf-p1-c001");
}

#[test]
fn keyword_retriever_ranks_by_overlap_and_truncates() {
    let (texts, metas) = corpus();
    let retriever = KeywordRetriever::new(texts, metas);
    let hits = retriever.search("holomorphic function complex differentiable", 2);
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].chunk_id, "notes-pdf-p1-c001");
    assert!(hits[0].score >= hits[1].score);
}

#[test]
fn tfidf_scores_stay_within_unit_interval() {
    let (texts, metas) = corpus();
    let retriever = TfidfRetriever::new(texts, metas);
    assert!(!retriever.is_degraded());
    let hits = retriever.search("complex differentiable holomorphic function", 10);
    assert!(!hits.is_empty());
    for hit in &hits {
        assert!(hit.score > 0.0 && hit.score <= 1.0 + 1e-6, "score {}", hit.score);
    }
}

#[test]
fn tfidf_ranks_identical_text_above_unrelated_text() {
    let (texts, metas) = corpus();
    let query = texts[2].clone();
    let retriever = TfidfRetriever::new(texts, metas);
    let hits = retriever.search(&query, 3);
    assert_eq!(hits[0].chunk_id, "notes-pdf-p1-c003");
    if hits.len() > 1 {
        assert!(hits[0].score > hits[1].score);
    }
}

#[test]
fn tfidf_excludes_non_positive_scores() {
    let (texts, metas) = corpus();
    let retriever = TfidfRetriever::new(texts, metas);
    let hits = retriever.search("photosynthesis chlorophyll", 10);
    assert!(hits.is_empty());
}

#[test]
fn forced_fallback_matches_keyword_output_shape() {
    let (texts, metas) = corpus();
    let degraded = TfidfRetriever::degraded(texts.clone(), metas.clone());
    assert!(degraded.is_degraded());

    let keyword = KeywordRetriever::new(texts, metas);
    let a = degraded.search("holomorphic domain", 5);
    let b = keyword.search("holomorphic domain", 5);
    assert_eq!(a.len(), b.len());
    for (x, y) in a.iter().zip(b.iter()) {
        assert_eq!(x.chunk_id, y.chunk_id);
        assert_eq!(x.source, y.source);
        assert_eq!(x.page, y.page);
        assert_eq!(x.text, y.text);
        assert_eq!(x.score, y.score);
    }
}

#[test]
fn empty_corpus_degrades_and_returns_nothing() {
    let retriever = TfidfRetriever::new(Vec::new(), Vec::new());
    assert!(retriever.is_degraded());
    assert!(retriever.search("anything", 5).is_empty());
}
