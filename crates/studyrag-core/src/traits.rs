use crate::types::RetrievedChunk;

/// A ranking strategy over a frozen chunk corpus.
///
/// Retrievers are read-only views built once per index generation; `search`
/// never fails, it returns fewer (possibly zero) hits instead.
pub trait Retriever: Send + Sync {
    fn search(&self, query: &str, top_k: usize) -> Vec<RetrievedChunk>;
}
