//! Single-concurrency request queue.
//!
//! All outbound classification calls go through one worker task, which runs
//! jobs strictly in FIFO order and pauses for the configured delay after each
//! one, success or failure, to stay under the remote rate limit.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::error::{AnalysisError, Result};
use crate::inference::Classifier;
use crate::models::LabelScore;

type Reply = oneshot::Sender<Result<Vec<LabelScore>>>;

/// One queued classification request
struct Job {
    text: String,
    reply: Reply,
}

/// Handle to the worker. Cloning shares the same queue.
#[derive(Clone)]
pub struct Scheduler {
    tx: mpsc::UnboundedSender<Job>,
    pending: Arc<AtomicUsize>,
}

impl Scheduler {
    /// Spawn the worker on the current tokio runtime.
    pub fn spawn(classifier: Arc<dyn Classifier>, delay: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let pending = Arc::new(AtomicUsize::new(0));
        tokio::spawn(run_worker(rx, classifier, delay, pending.clone()));
        info!(delay_ms = delay.as_millis() as u64, "👷 Request scheduler started");
        Self { tx, pending }
    }

    /// Enqueue `text` and wait for its outcome.
    pub async fn submit(&self, text: impl Into<String>) -> Result<Vec<LabelScore>> {
        let (reply, outcome) = oneshot::channel();
        self.pending.fetch_add(1, Ordering::SeqCst);
        if self.tx.send(Job { text: text.into(), reply }).is_err() {
            self.pending.fetch_sub(1, Ordering::SeqCst);
            return Err(AnalysisError::SchedulerClosed);
        }
        outcome.await.map_err(|_| AnalysisError::SchedulerClosed)?
    }

    /// Jobs enqueued but not yet finished, including the one in flight.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }
}

async fn run_worker(
    mut rx: mpsc::UnboundedReceiver<Job>,
    classifier: Arc<dyn Classifier>,
    delay: Duration,
    pending: Arc<AtomicUsize>,
) {
    while let Some(job) = rx.recv().await {
        debug!(queued = pending.load(Ordering::SeqCst), "👷 [Scheduler] Dispatching request");

        let outcome = classifier.classify(&job.text).await;
        if let Err(e) = &outcome {
            warn!(error = %e, "❌ [Scheduler] Request failed");
        }
        pending.fetch_sub(1, Ordering::SeqCst);

        // Caller may have gone away; the result is simply dropped.
        let _ = job.reply.send(outcome);

        sleep(delay).await;
    }
    debug!("👷 [Scheduler] Queue closed, worker exiting");
}
