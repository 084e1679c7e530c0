//! JSON-file persistence for results and batches.
//!
//! Two records live in the data directory, `results.json` and `batches.json`.
//! Each write replaces the whole file; last writer wins.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::models::{Batch, SentimentResult};

const RESULTS_FILE: &str = "results.json";
const BATCHES_FILE: &str = "batches.json";

#[derive(Debug, Clone)]
pub struct ResultStore {
    dir: PathBuf,
}

impl ResultStore {
    /// Open (and create if needed) the data directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load both collections. Missing or unreadable files yield empty collections.
    pub fn load(&self) -> (Vec<SentimentResult>, Vec<Batch>) {
        let results: Vec<SentimentResult> = self.read_records(RESULTS_FILE);
        let batches: Vec<Batch> = self.read_records(BATCHES_FILE);
        info!(
            results = results.len(),
            batches = batches.len(),
            dir = %self.dir.display(),
            "💾 Loaded persisted analyses"
        );
        (results, batches)
    }

    /// Stage both files before renaming either, so a failed write changes nothing.
    pub fn save(&self, results: &[SentimentResult], batches: &[Batch]) -> Result<()> {
        let staged = [
            self.stage_records(RESULTS_FILE, results)?,
            self.stage_records(BATCHES_FILE, batches)?,
        ];
        for (tmp, target) in staged {
            fs::rename(&tmp, &target)?;
        }
        debug!(results = results.len(), batches = batches.len(), "💾 Store saved");
        Ok(())
    }

    /// Remove both record files.
    pub fn clear(&self) -> Result<()> {
        for name in [RESULTS_FILE, BATCHES_FILE] {
            let path = self.dir.join(name);
            if path.exists() {
                fs::remove_file(&path)?;
            }
        }
        info!(dir = %self.dir.display(), "🧹 Store cleared");
        Ok(())
    }

    fn read_records<T: DeserializeOwned>(&self, name: &str) -> Vec<T> {
        let path = self.dir.join(name);
        if !path.exists() {
            return Vec::new();
        }

        match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<Vec<T>>(&content) {
                Ok(records) => records,
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "⚠️ Failed to parse store file, starting empty");
                    Vec::new()
                }
            },
            Err(e) => {
                warn!(file = %path.display(), error = %e, "⚠️ Failed to read store file, starting empty");
                Vec::new()
            }
        }
    }

    /// Write `records` next to `name` and return the (staged, final) paths.
    fn stage_records<T: Serialize>(&self, name: &str, records: &[T]) -> Result<(PathBuf, PathBuf)> {
        let json = serde_json::to_string_pretty(records)?;
        let tmp = self.dir.join(format!("{}.tmp", name));
        fs::write(&tmp, json)?;
        Ok((tmp, self.dir.join(name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BatchSummary, ScoreDistribution, Sentiment};
    use chrono::Utc;

    fn result(id: &str) -> SentimentResult {
        SentimentResult {
            id: id.to_string(),
            text: "pleasant surprise".to_string(),
            sentiment: Sentiment::Positive,
            confidence: 0.73,
            scores: ScoreDistribution::new(0.73, 0.1, 0.17),
            keywords: vec![],
            created_at: Utc::now(),
            explanation: Some("Positive".to_string()),
        }
    }

    #[test]
    fn test_empty_dir_loads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::open(dir.path().join("nested")).unwrap();
        let (results, batches) = store.load();
        assert!(results.is_empty());
        assert!(batches.is_empty());
        assert!(store.dir().exists());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::open(dir.path()).unwrap();
        let results = vec![result("a"), result("b")];
        let batch = Batch {
            id: "batch-1".to_string(),
            name: "reviews".to_string(),
            result_ids: vec!["a".to_string(), "b".to_string()],
            summary: BatchSummary::from_results(&results),
            created_at: Utc::now(),
        };
        store.save(&results, std::slice::from_ref(&batch)).unwrap();

        let (loaded_results, loaded_batches) = ResultStore::open(dir.path()).unwrap().load();
        assert_eq!(loaded_results, results);
        assert_eq!(loaded_batches, vec![batch]);
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(RESULTS_FILE), "{ not json").unwrap();
        let store = ResultStore::open(dir.path()).unwrap();
        assert!(store.load().0.is_empty());
    }

    #[test]
    fn test_failed_save_keeps_previous_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::open(dir.path()).unwrap();
        store.save(&[result("a")], &[]).unwrap();

        std::fs::create_dir_all(dir.path().join("batches.json.tmp")).unwrap();
        let err = store.save(&[result("a"), result("b")], &[]).unwrap_err();
        assert!(matches!(err, crate::error::AnalysisError::Storage(_)));

        let (results, batches) = store.load();
        let ids: Vec<_> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a"]);
        assert!(batches.is_empty());
    }

    #[test]
    fn test_clear_removes_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::open(dir.path()).unwrap();
        store.save(&[result("a")], &[]).unwrap();
        assert!(dir.path().join(RESULTS_FILE).exists());

        store.clear().unwrap();
        assert!(!dir.path().join(RESULTS_FILE).exists());
        assert!(!dir.path().join(BATCHES_FILE).exists());
        store.clear().unwrap();
    }
}
