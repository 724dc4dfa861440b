//! Evidence-only answer builder (extractive, citation-anchored).
//!
//! Picks the most informative sentences from retrieved chunks and renders
//! them with explicit citations. Nothing is generated: every sentence is
//! verbatim evidence text, and when no usable sentence exists the fixed
//! [`INSUFFICIENT_EVIDENCE`] message is returned instead of a guess.

use std::collections::HashSet;

use studyrag_core::tokenize::token_set;
use studyrag_core::types::Evidence;

/// Returned when no evidence sentence survives filtering.
pub const INSUFFICIENT_EVIDENCE: &str =
    "I couldn't find sufficient evidence in the retrieved chunks to answer this question.";

/// Sentences shorter than this are treated as fragments and dropped.
const MIN_SENTENCE_CHARS: usize = 40;

/// Weight of query-term coverage relative to the chunk's retrieval score.
const COVERAGE_WEIGHT: f32 = 0.05;

/// Conservative sentence splitter for lecture notes and math-heavy text.
///
/// A boundary exists after `.`/`!`/`?` followed by whitespace and then an
/// uppercase letter, a digit or an opening parenthesis. This deliberately
/// refuses to split on abbreviations or mid-formula punctuation.
pub fn split_sentences(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.trim().chars().collect();
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < chars.len() {
        if matches!(chars[i], '.' | '!' | '?') {
            let mut j = i + 1;
            while j < chars.len() && chars[j].is_whitespace() {
                j += 1;
            }
            let splits = j > i + 1
                && j < chars.len()
                && (chars[j].is_ascii_uppercase() || chars[j].is_ascii_digit() || chars[j] == '(');
            if splits {
                push_trimmed(&mut sentences, &chars[start..=i]);
                start = j;
                i = j;
                continue;
            }
        }
        i += 1;
    }
    push_trimmed(&mut sentences, &chars[start..]);
    sentences
}

fn push_trimmed(sentences: &mut Vec<String>, chars: &[char]) {
    let s: String = chars.iter().collect();
    let s = s.trim();
    if !s.is_empty() {
        sentences.push(s.to_string());
    }
}

/// Compose a citation-anchored answer from already-retrieved evidence.
///
/// Candidate sentences are scored as chunk retrieval score plus a small
/// bonus per distinct query term they cover, then greedily selected up to
/// `max_sentences` with a diversity cap: a citation that already
/// contributed only gets another slot while fewer than `max_sentences / 2`
/// sentences have been chosen so far.
pub fn compose_answer(question: &str, evidence: &[Evidence], max_sentences: usize) -> String {
    let mut pool: Vec<(String, &str, f32)> = Vec::new();
    for e in evidence {
        for sentence in split_sentences(&e.text) {
            if sentence.chars().count() < MIN_SENTENCE_CHARS {
                continue;
            }
            pool.push((sentence, e.citation.as_str(), e.score));
        }
    }
    if pool.is_empty() {
        return INSUFFICIENT_EVIDENCE.to_string();
    }

    let q_terms = token_set(question);
    let mut scored: Vec<(f32, String, &str)> = pool
        .into_iter()
        .map(|(sentence, citation, base)| {
            let coverage = token_set(&sentence).intersection(&q_terms).count();
            (base + COVERAGE_WEIGHT * coverage as f32, sentence, citation)
        })
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));

    let mut chosen: Vec<(String, &str)> = Vec::new();
    let mut used_citations: HashSet<&str> = HashSet::new();
    for (_, sentence, citation) in scored {
        if chosen.len() >= max_sentences {
            break;
        }
        if used_citations.contains(citation) && chosen.len() >= max_sentences / 2 {
            continue;
        }
        used_citations.insert(citation);
        chosen.push((sentence, citation));
    }

    let mut lines = Vec::new();
    lines.push("**Answer (evidence-grounded):**".to_string());
    lines.push(String::new());
    for (sentence, citation) in &chosen {
        lines.push(format!("- {sentence}  \n  `{citation}`"));
    }
    lines.push(String::new());
    lines.push(
        "**Notes:** This answer is compiled *only* from retrieved PDF evidence; \
         if it feels incomplete, increase Top-K or rebuild the index with different chunking."
            .to_string(),
    );
    lines.join("\n")
}
