//! Core data types: sentiments, score distributions, results and batches.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Canonical sentiment vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    /// Fixed enumeration order, also used to break ties.
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Probability mass assigned to each canonical sentiment
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, ToSchema)]
pub struct ScoreDistribution {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

impl ScoreDistribution {
    pub fn new(positive: f64, negative: f64, neutral: f64) -> Self {
        Self { positive, negative, neutral }
    }

    pub fn get(&self, sentiment: Sentiment) -> f64 {
        match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Negative => self.negative,
            Sentiment::Neutral => self.neutral,
        }
    }

    pub fn get_mut(&mut self, sentiment: Sentiment) -> &mut f64 {
        match sentiment {
            Sentiment::Positive => &mut self.positive,
            Sentiment::Negative => &mut self.negative,
            Sentiment::Neutral => &mut self.neutral,
        }
    }

    pub fn sum(&self) -> f64 {
        self.positive + self.negative + self.neutral
    }
}

/// Raw `{label, score}` pair as returned by the remote classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

/// Normalized verdict produced by either the live client or the simulator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub sentiment: Sentiment,
    pub confidence: f64,
    pub scores: ScoreDistribution,
}

/// Sentiment-bearing token surfaced from the source text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Keyword {
    pub word: String,
    pub sentiment: Sentiment,
    pub weight: f64,
}

/// A single stored analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SentimentResult {
    #[schema(example = "3f1c1b8e-2f7e-4c55-9d0a-5b1f0e2d9a11")]
    pub id: String,
    pub text: String,
    pub sentiment: Sentiment,
    pub confidence: f64,
    pub scores: ScoreDistribution,
    pub keywords: Vec<Keyword>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
pub struct BatchSummary {
    pub total_texts: usize,
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
    pub average_confidence: f64,
}

impl BatchSummary {
    pub fn from_results(results: &[SentimentResult]) -> Self {
        let count = |s: Sentiment| results.iter().filter(|r| r.sentiment == s).count();
        let average_confidence = if results.is_empty() {
            0.0
        } else {
            results.iter().map(|r| r.confidence).sum::<f64>() / results.len() as f64
        };

        Self {
            total_texts: results.len(),
            positive: count(Sentiment::Positive),
            negative: count(Sentiment::Negative),
            neutral: count(Sentiment::Neutral),
            average_confidence,
        }
    }
}

/// Named group of analyses. Member ids are kept in processing order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Batch {
    pub id: String,
    pub name: String,
    pub result_ids: Vec<String>,
    pub summary: BatchSummary,
    pub created_at: DateTime<Utc>,
}
