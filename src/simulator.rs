//! Offline demo path.
//!
//! Produces plausible classifications from lexicon hit counts so the service
//! can be evaluated without an API key.

use std::ops::Range;
use std::time::Duration;

use rand::Rng;
use tokio::time::sleep;
use tracing::debug;

use crate::lexicon;
use crate::models::{Classification, ScoreDistribution, Sentiment};

const BASE_CONFIDENCE: f64 = 0.65;
const CONFIDENCE_PER_HIT: f64 = 0.08;
const MAX_CONFIDENCE: f64 = 0.92;

#[derive(Debug, Clone)]
pub struct Simulator {
    /// Artificial latency bounds, in milliseconds
    latency_ms: Range<u64>,
}

impl Default for Simulator {
    fn default() -> Self {
        Self { latency_ms: 1500..2500 }
    }
}

impl Simulator {
    pub fn with_latency(latency_ms: Range<u64>) -> Self {
        Self { latency_ms }
    }

    /// No artificial delay at all.
    pub fn instant() -> Self {
        Self { latency_ms: 0..0 }
    }

    pub async fn classify(&self, text: &str) -> Classification {
        if !self.latency_ms.is_empty() {
            let wait_ms = {
                let mut rng = rand::thread_rng();
                rng.gen_range(self.latency_ms.clone())
            };
            sleep(Duration::from_millis(wait_ms)).await;
        }

        let (positive_hits, negative_hits) = lexicon::count_hits(text);
        let classification = simulate(positive_hits, negative_hits, &mut rand::thread_rng());
        debug!(
            positive_hits,
            negative_hits,
            sentiment = %classification.sentiment,
            "🎭 Simulated classification"
        );
        classification
    }
}

/// Derive a classification from hit counts.
pub fn simulate<R: Rng>(positive_hits: usize, negative_hits: usize, rng: &mut R) -> Classification {
    let (winner, confidence) = if positive_hits > negative_hits {
        (Sentiment::Positive, hit_confidence(positive_hits))
    } else if negative_hits > positive_hits {
        (Sentiment::Negative, hit_confidence(negative_hits))
    } else {
        (Sentiment::Neutral, rng.gen_range(0.55..0.80))
    };

    let remainder = 1.0 - confidence;
    let mut scores = ScoreDistribution::default();
    for sentiment in Sentiment::ALL {
        *scores.get_mut(sentiment) = if sentiment == winner {
            confidence
        } else {
            rng.gen::<f64>() * remainder
        };
    }

    let sum = scores.sum();
    for sentiment in Sentiment::ALL {
        *scores.get_mut(sentiment) /= sum;
    }

    Classification {
        sentiment: winner,
        confidence: scores.get(winner),
        scores,
    }
}

fn hit_confidence(hits: usize) -> f64 {
    (BASE_CONFIDENCE + CONFIDENCE_PER_HIT * hits as f64).min(MAX_CONFIDENCE)
}
