//! Text features for skill comparison.
//!
//! Provides pure functions for estimating how similar two skill strings are:
//! - Text normalization and tokenization
//! - Edit similarity (Levenshtein)
//! - Token Jaccard and token cosine similarity
//! - The combined similarity estimate used by clustering

use std::collections::{HashMap, HashSet};

use strsim::levenshtein;

/// Similarity returned for a normalized-substring containment match,
/// e.g. "React" inside "React.js".
const CONTAINMENT_SIMILARITY: f64 = 0.9;

const EDIT_WEIGHT: f64 = 0.4;
const JACCARD_WEIGHT: f64 = 0.3;
const COSINE_WEIGHT: f64 = 0.3;

/// Normalize text for comparison: lowercase, replace anything that is not a
/// word or whitespace character with a space, collapse runs of whitespace.
pub fn normalize_text(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Character-level edit similarity: `1 - distance / max_len`.
pub fn edit_similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / max_len as f64
}

/// Jaccard similarity over whitespace token sets.
///
/// Two empty token sets are considered identical.
pub fn jaccard_similarity(a: &str, b: &str) -> f64 {
    let set_a: HashSet<&str> = a.split_whitespace().collect();
    let set_b: HashSet<&str> = b.split_whitespace().collect();

    if set_a.is_empty() && set_b.is_empty() {
        return 1.0;
    }

    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();
    intersection as f64 / union as f64
}

/// Cosine similarity over term-frequency vectors built from the union
/// vocabulary of the two strings' tokens. Zero if either vector has no
/// magnitude.
pub fn cosine_similarity(a: &str, b: &str) -> f64 {
    let freq_a = term_frequencies(a);
    let freq_b = term_frequencies(b);

    let vocabulary: HashSet<&str> = freq_a.keys().chain(freq_b.keys()).copied().collect();

    let mut dot = 0.0;
    let mut mag_a = 0.0;
    let mut mag_b = 0.0;
    for term in vocabulary {
        let fa = freq_a.get(term).copied().unwrap_or(0) as f64;
        let fb = freq_b.get(term).copied().unwrap_or(0) as f64;
        dot += fa * fb;
        mag_a += fa * fa;
        mag_b += fb * fb;
    }

    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }
    dot / (mag_a.sqrt() * mag_b.sqrt())
}

fn term_frequencies(text: &str) -> HashMap<&str, usize> {
    let mut freq = HashMap::new();
    for token in text.split_whitespace() {
        *freq.entry(token).or_insert(0) += 1;
    }
    freq
}

/// Estimate how similar two skill strings are, in `[0, 1]`.
///
/// Identical normalized strings score 1.0 and containment either way scores
/// 0.9; otherwise the result is a weighted sum of edit, Jaccard, and cosine
/// similarity over the normalized strings.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = normalize_text(a);
    let b = normalize_text(b);

    if a == b {
        return 1.0;
    }

    if a.contains(&b) || b.contains(&a) {
        return CONTAINMENT_SIMILARITY;
    }

    EDIT_WEIGHT * edit_similarity(&a, &b)
        + JACCARD_WEIGHT * jaccard_similarity(&a, &b)
        + COSINE_WEIGHT * cosine_similarity(&a, &b)
}
