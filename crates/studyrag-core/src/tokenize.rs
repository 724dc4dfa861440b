//! Query/chunk tokenization shared by both retrievers and the answer builder.

use std::collections::HashSet;

/// Split text into case-folded runs of ASCII alphabetic characters.
///
/// Digits and punctuation act as separators, never as token content, so
/// "Cauchy-Riemann (1851)" tokenizes to ["cauchy", "riemann"].
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    for ch in text.chars() {
        if ch.is_ascii_alphabetic() {
            current.push(ch.to_ascii_lowercase());
        } else if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Distinct tokens of a text; term frequency is discarded.
pub fn token_set(text: &str) -> HashSet<String> {
    tokenize(text).into_iter().collect()
}
