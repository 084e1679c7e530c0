//! Label mapping and score normalization.
//!
//! Remote models disagree on label vocabulary: some emit `POSITIVE`/`NEGATIVE`,
//! some `LABEL_0..LABEL_2`, some star ratings. Everything is folded into the
//! canonical three-way [`ScoreDistribution`] here.

use crate::models::{Classification, LabelScore, ScoreDistribution, Sentiment};

/// Allowed deviation of the distribution sum from 1.0
pub const SUM_TOLERANCE: f64 = 0.01;

/// Map a raw classifier label onto the canonical vocabulary.
pub fn map_label(raw: &str) -> Sentiment {
    let label = raw.trim().to_lowercase();

    if label.contains("positive")
        || label == "pos"
        || label == "label_2"
        || label.contains("4 star")
        || label.contains("5 star")
    {
        Sentiment::Positive
    } else if label.contains("negative")
        || label == "neg"
        || label == "label_0"
        || label.contains("1 star")
        || label.contains("2 star")
    {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

/// Aggregate, clamp and rescale raw scores into a distribution.
///
/// A zero sum is left as the zero triple.
pub fn normalize_scores(raw: &[LabelScore]) -> ScoreDistribution {
    let mut scores = ScoreDistribution::default();
    for entry in raw {
        *scores.get_mut(map_label(&entry.label)) += entry.score;
    }

    for sentiment in Sentiment::ALL {
        let bucket = scores.get_mut(sentiment);
        *bucket = bucket.clamp(0.0, 1.0);
    }

    let sum = scores.sum();
    if sum > 0.0 && (sum - 1.0).abs() > SUM_TOLERANCE {
        for sentiment in Sentiment::ALL {
            *scores.get_mut(sentiment) /= sum;
        }
    }

    scores
}

/// Pick the verdict: highest score, first maximum in enumeration order wins.
pub fn verdict(scores: &ScoreDistribution) -> (Sentiment, f64) {
    let mut best = (Sentiment::Positive, scores.positive);
    for sentiment in [Sentiment::Negative, Sentiment::Neutral] {
        let value = scores.get(sentiment);
        if value > best.1 {
            best = (sentiment, value);
        }
    }
    best
}

/// Full pipeline from raw classifier output to a [`Classification`].
pub fn classify(raw: &[LabelScore]) -> Classification {
    let scores = normalize_scores(raw);
    let (sentiment, confidence) = verdict(&scores);
    Classification { sentiment, confidence, scores }
}
