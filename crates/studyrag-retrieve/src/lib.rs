//! studyrag-retrieve
//!
//! The two interchangeable ranking strategies over a chunk corpus: raw
//! keyword overlap (`lexical`) and TF-IDF cosine similarity (`tfidf`).
//! Both are built once per index generation and are read-only afterwards.

pub mod lexical;
pub mod tfidf;

pub use lexical::KeywordRetriever;
pub use tfidf::TfidfRetriever;
