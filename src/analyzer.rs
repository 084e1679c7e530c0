//! Analysis orchestrator.
//!
//! Owns the [`AnalysisState`] and the [`ResultStore`], routes each text either
//! through the request scheduler (live) or the demo simulator, and persists
//! after every mutation. Batches are all-or-nothing.

use chrono::Utc;
use serde::Serialize;
use tokio::sync::watch;
use tracing::{error, info};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AnalysisError, Result};
use crate::inference::truncate_input;
use crate::labels;
use crate::lexicon;
use crate::models::{Batch, BatchSummary, Classification, Keyword, SentimentResult};
use crate::scheduler::Scheduler;
use crate::simulator::Simulator;
use crate::state::{AnalysisState, StateSnapshot};
use crate::store::ResultStore;

/// Which path analyses take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    Live,
    Demo,
}

pub struct Analyzer {
    state: AnalysisState,
    store: ResultStore,
    scheduler: Option<Scheduler>,
    simulator: Simulator,
    progress: watch::Sender<StateSnapshot>,
}

impl Analyzer {
    /// Hydrate state from `store`. Without a scheduler every call runs in demo mode.
    pub fn open(store: ResultStore, scheduler: Option<Scheduler>, simulator: Simulator) -> Self {
        let (results, batches) = store.load();
        let state = AnalysisState::hydrate(results, batches);
        let (progress, _) = watch::channel(state.snapshot());
        Self { state, store, scheduler, simulator, progress }
    }

    pub fn mode(&self) -> AnalysisMode {
        if self.scheduler.is_some() {
            AnalysisMode::Live
        } else {
            AnalysisMode::Demo
        }
    }

    pub fn state(&self) -> &AnalysisState {
        &self.state
    }

    pub fn scheduler(&self) -> Option<&Scheduler> {
        self.scheduler.as_ref()
    }

    /// Observe loading/progress without holding a reference to the analyzer.
    pub fn subscribe(&self) -> watch::Receiver<StateSnapshot> {
        self.progress.subscribe()
    }

    fn publish(&self) {
        self.progress.send_replace(self.state.snapshot());
    }

    /// Apply `change` to a copy of the state, persist the copy, then adopt it.
    /// A failed write leaves both memory and disk as they were.
    fn commit(&mut self, change: impl FnOnce(&mut AnalysisState)) -> Result<()> {
        let mut next = self.state.clone();
        change(&mut next);
        self.store.save(&next.results, &next.batches)?;
        self.state = next;
        self.publish();
        Ok(())
    }

    fn fail<T>(&mut self, err: AnalysisError) -> Result<T> {
        error!(error = %err, "❌ Analysis failed");
        self.state.fail(err.to_string());
        self.publish();
        Err(err)
    }

    /// Classify and build a result without touching the collections.
    async fn run(&self, text: &str, use_simulation: bool) -> Result<SentimentResult> {
        let text = truncate_input(text.trim());

        let classification = match (&self.scheduler, use_simulation) {
            (Some(scheduler), false) => {
                let raw = scheduler.submit(text.clone()).await?;
                labels::classify(&raw)
            }
            _ => self.simulator.classify(&text).await,
        };

        let keywords = lexicon::extract_keywords(&text, classification.sentiment);
        let explanation = explain(&classification, &keywords);

        Ok(SentimentResult {
            id: Uuid::new_v4().to_string(),
            text,
            sentiment: classification.sentiment,
            confidence: classification.confidence,
            scores: classification.scores,
            keywords,
            created_at: Utc::now(),
            explanation: Some(explanation),
        })
    }

    pub async fn analyze_one(&mut self, text: &str, use_simulation: bool) -> Result<SentimentResult> {
        if text.trim().is_empty() {
            return self.fail(AnalysisError::InvalidInput("text is empty".to_string()));
        }

        self.state.begin();
        self.publish();

        let result = match self.run(text, use_simulation).await {
            Ok(result) => result,
            Err(e) => return self.fail(e),
        };

        let committed = self.commit(|state| {
            state.record_result(result.clone());
            state.set_progress(1, 1);
        });
        if let Err(e) = committed {
            return self.fail(e);
        }

        info!(
            id = %result.id,
            sentiment = %result.sentiment,
            confidence = result.confidence,
            "🧠 Text analyzed"
        );
        Ok(result)
    }

    pub async fn analyze_batch<S: AsRef<str>>(
        &mut self,
        texts: &[S],
        name: &str,
        use_simulation: bool,
    ) -> Result<Batch> {
        let inputs: Vec<&str> = texts
            .iter()
            .map(|t| t.as_ref())
            .filter(|t| !t.trim().is_empty())
            .collect();

        if inputs.is_empty() {
            return self.fail(AnalysisError::InvalidInput(
                "batch contains no non-blank texts".to_string(),
            ));
        }

        self.state.begin();
        self.publish();
        info!(name = %name, total = inputs.len(), "📦 Batch started");

        let total = inputs.len();
        let mut results = Vec::with_capacity(total);
        for (index, text) in inputs.iter().enumerate() {
            match self.run(text, use_simulation).await {
                Ok(result) => results.push(result),
                Err(e) => return self.fail(e),
            }
            self.state.set_progress(index + 1, total);
            self.publish();
            info!(
                name = %name,
                completed = index + 1,
                total,
                progress = self.state.progress,
                "📦 Batch progress"
            );
        }

        let batch = Batch {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            result_ids: results.iter().map(|r| r.id.clone()).collect(),
            summary: BatchSummary::from_results(&results),
            created_at: Utc::now(),
        };

        let record = batch.clone();
        if let Err(e) = self.commit(move |state| state.record_batch(record, results)) {
            return self.fail(e);
        }

        info!(
            id = %batch.id,
            positive = batch.summary.positive,
            negative = batch.summary.negative,
            neutral = batch.summary.neutral,
            "✅ Batch completed"
        );
        Ok(batch)
    }

    /// Remove a single result. Returns `false` if it was not present.
    pub fn delete_result(&mut self, id: &str) -> Result<bool> {
        if self.state.find_result(id).is_none() {
            return Ok(false);
        }
        if let Err(e) = self.commit(|state| {
            state.remove_result(id);
        }) {
            return self.fail(e);
        }
        Ok(true)
    }

    /// Remove a batch together with its member results.
    pub fn delete_batch(&mut self, id: &str) -> Result<bool> {
        if !self.state.batches.iter().any(|b| b.id == id) {
            return Ok(false);
        }
        if let Err(e) = self.commit(|state| {
            state.remove_batch(id);
        }) {
            return self.fail(e);
        }
        info!(id = %id, "🗑️ Batch deleted");
        Ok(true)
    }

    /// Empty both collections on disk first, then drop the record files.
    pub fn clear_all(&mut self) -> Result<()> {
        if let Err(e) = self.commit(AnalysisState::reset) {
            return self.fail(e);
        }
        if let Err(e) = self.store.clear() {
            return self.fail(e);
        }
        Ok(())
    }
}

fn confidence_band(confidence: f64) -> &'static str {
    if confidence >= 0.85 {
        "Strongly"
    } else if confidence >= 0.65 {
        "Moderately"
    } else {
        "Weakly"
    }
}

/// Human-readable summary of a classification.
fn explain(classification: &Classification, keywords: &[Keyword]) -> String {
    let mut text = format!(
        "{} {} ({:.0}% confidence)",
        confidence_band(classification.confidence),
        classification.sentiment,
        classification.confidence * 100.0
    );
    if !keywords.is_empty() {
        let words: Vec<&str> = keywords.iter().map(|k| k.word.as_str()).collect();
        text.push_str(&format!("; key terms: {}", words.join(", ")));
    }
    text
}
