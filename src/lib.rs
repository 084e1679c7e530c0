//! Sentiment analysis orchestration: a rate-limited request queue in front of
//! a remote classifier, label normalization, a batch pipeline with progress
//! reporting, and a local JSON store for results and batches.

pub mod analyzer;
pub mod api;
pub mod config;
pub mod error;
pub mod inference;
pub mod labels;
pub mod lexicon;
pub mod models;
pub mod scheduler;
pub mod simulator;
pub mod state;
pub mod store;

pub use analyzer::{AnalysisMode, Analyzer};
pub use config::Settings;
pub use error::{AnalysisError, Result};
pub use inference::{Classifier, InferenceClient};
pub use models::{Batch, BatchSummary, Classification, Keyword, ScoreDistribution, Sentiment, SentimentResult};
pub use scheduler::Scheduler;
pub use simulator::Simulator;
pub use state::{AnalysisState, StateSnapshot};
pub use store::ResultStore;
