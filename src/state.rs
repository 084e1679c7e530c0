//! Analysis state and its transitions.
//!
//! The state is a plain owned value. The analyzer drives it exclusively through
//! the transition methods below, each of which leaves the invariants intact:
//! progress stays within `[0, 100]`, collections stay most-recent-first, and a
//! batch deletion removes exactly its own members.

use std::collections::HashSet;

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{Batch, SentimentResult};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisState {
    pub loading: bool,
    pub progress: f64,
    pub error: Option<String>,
    pub results: Vec<SentimentResult>,
    pub batches: Vec<Batch>,
}

/// Lightweight view of the state without the collections
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct StateSnapshot {
    pub loading: bool,
    pub progress: f64,
    pub error: Option<String>,
    pub result_count: usize,
    pub batch_count: usize,
}

impl AnalysisState {
    /// Hydrate from persisted collections.
    pub fn hydrate(results: Vec<SentimentResult>, batches: Vec<Batch>) -> Self {
        Self { results, batches, ..Self::default() }
    }

    pub fn begin(&mut self) {
        self.loading = true;
        self.progress = 0.0;
        self.error = None;
    }

    /// Progress as `completed / total * 100`, clamped.
    pub fn set_progress(&mut self, completed: usize, total: usize) {
        self.progress = if total == 0 {
            0.0
        } else {
            (completed as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
        };
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.progress = 0.0;
        self.error = Some(message.into());
    }

    pub fn record_result(&mut self, result: SentimentResult) {
        self.results.insert(0, result);
        self.loading = false;
    }

    /// Prepend `results` as one block, keeping their order, then the batch itself.
    pub fn record_batch(&mut self, batch: Batch, results: Vec<SentimentResult>) {
        self.results.splice(0..0, results);
        self.batches.insert(0, batch);
        self.loading = false;
        self.progress = 100.0;
    }

    pub fn remove_result(&mut self, id: &str) -> bool {
        let before = self.results.len();
        self.results.retain(|r| r.id != id);
        self.results.len() != before
    }

    /// Remove the batch and every result listed as its member.
    pub fn remove_batch(&mut self, id: &str) -> bool {
        let Some(pos) = self.batches.iter().position(|b| b.id == id) else {
            return false;
        };
        let batch = self.batches.remove(pos);
        let members: HashSet<&str> = batch.result_ids.iter().map(String::as_str).collect();
        self.results.retain(|r| !members.contains(r.id.as_str()));
        true
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            loading: self.loading,
            progress: self.progress,
            error: self.error.clone(),
            result_count: self.results.len(),
            batch_count: self.batches.len(),
        }
    }

    pub fn find_result(&self, id: &str) -> Option<&SentimentResult> {
        self.results.iter().find(|r| r.id == id)
    }

    /// Member results of a batch in batch order; deleted members are skipped.
    pub fn batch_results(&self, batch_id: &str) -> Option<Vec<&SentimentResult>> {
        let batch = self.batches.iter().find(|b| b.id == batch_id)?;
        Some(batch.result_ids.iter().filter_map(|id| self.find_result(id)).collect())
    }
}
