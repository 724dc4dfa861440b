//! studyrag-index
//!
//! The corpus aggregate: [`index::RagIndex`] owns one generation of chunks,
//! builds both retrievers over it and dispatches searches; [`answer`] turns
//! ranked evidence into an extractive, citation-anchored answer.

pub mod answer;
pub mod index;

pub use answer::{compose_answer, INSUFFICIENT_EVIDENCE};
pub use index::{IndexState, RagIndex};
