//! Keyword lexicons and extraction.
//!
//! Curated word lists drive two things: surfacing sentiment-bearing keywords on
//! every result, and the hit counts the demo simulator bases its verdict on.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use crate::models::{Keyword, Sentiment};

/// Weight given to every lexicon hit
pub const KEYWORD_WEIGHT: f64 = 0.8;

/// Maximum number of keywords kept per result
pub const MAX_KEYWORDS: usize = 5;

static POSITIVE_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    vec![
        "good", "great", "excellent", "amazing", "wonderful", "fantastic", "awesome",
        "brilliant", "outstanding", "superb", "love", "loved", "best", "perfect",
        "happy", "beautiful", "incredible", "delightful", "pleasant", "impressive",
        "enjoy", "enjoyed", "recommend", "satisfied", "nice", "favorite",
    ]
    .into_iter()
    .collect()
});

static NEGATIVE_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    vec![
        "bad", "terrible", "awful", "horrible", "poor", "worst", "hate", "hated",
        "disappointing", "disappointed", "boring", "useless", "broken", "annoying",
        "frustrating", "sad", "angry", "waste", "mediocre", "ugly", "slow", "fail",
        "failed", "failure", "wrong", "pathetic",
    ]
    .into_iter()
    .collect()
});

static WORD_BOUNDARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w+\b").expect("valid word regex"));

/// Lexicon lookup for a single lower-cased token.
pub fn lookup(word: &str) -> Option<Sentiment> {
    if POSITIVE_WORDS.contains(word) {
        Some(Sentiment::Positive)
    } else if NEGATIVE_WORDS.contains(word) {
        Some(Sentiment::Negative)
    } else {
        None
    }
}

fn tokens(text: &str) -> Vec<String> {
    let lowercase_text = text.to_lowercase();
    WORD_BOUNDARY
        .find_iter(&lowercase_text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Lexicon hit counts as `(positive, negative)`. Repeated words count every time.
pub fn count_hits(text: &str) -> (usize, usize) {
    tokens(text)
        .iter()
        .fold((0, 0), |(pos, neg), word| match lookup(word) {
            Some(Sentiment::Positive) => (pos + 1, neg),
            Some(Sentiment::Negative) => (pos, neg + 1),
            _ => (pos, neg),
        })
}

/// Extract up to [`MAX_KEYWORDS`] lexicon hits in scan order, first occurrence wins.
///
/// `_verdict` is accepted for call-site symmetry; extraction is purely lexicon-driven.
pub fn extract_keywords(text: &str, _verdict: Sentiment) -> Vec<Keyword> {
    let mut seen = HashSet::new();
    tokens(text)
        .into_iter()
        .filter_map(|word| lookup(&word).map(|sentiment| (word, sentiment)))
        .filter(|(word, _)| seen.insert(word.clone()))
        .take(MAX_KEYWORDS)
        .map(|(word, sentiment)| Keyword { word, sentiment, weight: KEYWORD_WEIGHT })
        .collect()
}
