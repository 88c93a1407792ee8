//! Auto-save
//!
//! Debounced, latest-wins persistence of editor snapshots. A single task owns
//! the save target, so saves never overlap and complete in submission order.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::domain::aggregates::FormDocument;
use crate::domain::value_objects::{FormId, Identity};
use crate::ports::inbound::{FormUseCases, UseCaseError};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(800);

#[derive(Clone, Debug)]
pub struct AutoSaveConfig {
    /// Quiet window after the last change before a save starts
    pub debounce: Duration,
}

impl Default for AutoSaveConfig {
    fn default() -> Self {
        Self { debounce: DEFAULT_DEBOUNCE }
    }
}

/// Where snapshots are written
#[async_trait]
pub trait SaveTarget: Send + Sync + 'static {
    async fn save(&self, document: FormDocument) -> Result<(), UseCaseError>;
}

/// Saves through the form use cases on behalf of one user
pub struct ServiceSaveTarget {
    service: Arc<dyn FormUseCases>,
    actor: Identity,
    form_id: FormId,
}

impl ServiceSaveTarget {
    pub fn new(service: Arc<dyn FormUseCases>, actor: Identity, form_id: FormId) -> Self {
        Self { service, actor, form_id }
    }
}

#[async_trait]
impl SaveTarget for ServiceSaveTarget {
    async fn save(&self, document: FormDocument) -> Result<(), UseCaseError> {
        self.service
            .save_document(&self.actor, self.form_id, document)
            .await
            .map(|_| ())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "state", content = "error", rename_all = "snake_case")]
pub enum SaveStatus {
    Idle,
    Pending,
    Saving,
    Saved,
    Failed(String),
}

impl SaveStatus {
    /// The last save finished and nothing is waiting
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Saved | Self::Failed(_))
    }
}

/// Handle to the background save task
pub struct AutoSaver {
    snapshots: mpsc::UnboundedSender<FormDocument>,
    status: watch::Receiver<SaveStatus>,
    worker: JoinHandle<()>,
}

impl AutoSaver {
    /// Spawn the save task on the current runtime
    pub fn spawn(target: Arc<dyn SaveTarget>, config: AutoSaveConfig) -> Self {
        let (snapshots, rx) = mpsc::unbounded_channel();
        let (status_tx, status) = watch::channel(SaveStatus::Idle);
        let worker = tokio::spawn(run(rx, target, config.debounce, status_tx));
        Self { snapshots, status, worker }
    }

    /// Queue a snapshot. Returns false once the task has stopped.
    pub fn schedule(&self, document: FormDocument) -> bool {
        self.snapshots.send(document).is_ok()
    }

    pub fn status(&self) -> SaveStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SaveStatus> {
        self.status.clone()
    }

    /// Stop without saving queued snapshots
    pub fn abort(self) {
        self.worker.abort();
    }

    /// Save any pending snapshot immediately, then stop
    pub async fn shutdown(self) {
        drop(self.snapshots);
        if let Err(e) = self.worker.await {
            warn!(error = %e, "Auto-save task ended abnormally");
        }
    }
}

async fn run(
    mut snapshots: mpsc::UnboundedReceiver<FormDocument>,
    target: Arc<dyn SaveTarget>,
    debounce: Duration,
    status: watch::Sender<SaveStatus>,
) {
    while let Some(mut latest) = snapshots.recv().await {
        status.send_replace(SaveStatus::Pending);

        // Every newer snapshot restarts the window; a closed channel flushes.
        loop {
            match tokio::time::timeout(debounce, snapshots.recv()).await {
                Ok(Some(newer)) => latest = newer,
                Ok(None) | Err(_) => break,
            }
        }

        status.send_replace(SaveStatus::Saving);
        debug!(menu_id = %latest.menu_id, fields = latest.fields.len(), "Auto-saving form");
        match target.save(latest).await {
            Ok(()) => {
                status.send_replace(SaveStatus::Saved);
            }
            Err(e) => {
                warn!(error = %e, "Auto-save failed");
                status.send_replace(SaveStatus::Failed(e.to_string()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct RecordingTarget {
        saved: Mutex<Vec<String>>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        delay: Duration,
        fail: bool,
    }

    #[async_trait]
    impl SaveTarget for RecordingTarget {
        async fn save(&self, document: FormDocument) -> Result<(), UseCaseError> {
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(current, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.saved.lock().push(document.label);
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            if self.fail {
                Err(UseCaseError::invalid("store unavailable"))
            } else {
                Ok(())
            }
        }
    }

    fn doc(label: &str) -> FormDocument {
        FormDocument::new("FORM_1", label)
    }

    fn saver(target: &Arc<RecordingTarget>) -> AutoSaver {
        AutoSaver::spawn(target.clone(), AutoSaveConfig::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_collapses_to_latest() {
        let target = Arc::new(RecordingTarget::default());
        let saver = saver(&target);

        for label in ["a", "b", "c"] {
            assert!(saver.schedule(doc(label)));
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert!(target.saved.lock().is_empty());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(*target.saved.lock(), vec!["c".to_string()]);
        assert_eq!(saver.status(), SaveStatus::Saved);
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_edits_save_separately() {
        let target = Arc::new(RecordingTarget::default());
        let saver = saver(&target);

        saver.schedule(doc("a"));
        tokio::time::sleep(Duration::from_millis(900)).await;
        saver.schedule(doc("b"));
        tokio::time::sleep(Duration::from_millis(900)).await;

        assert_eq!(*target.saved.lock(), vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_flushes_pending_snapshot() {
        let target = Arc::new(RecordingTarget::default());
        let saver = saver(&target);

        saver.schedule(doc("draft"));
        saver.shutdown().await;
        assert_eq!(*target.saved.lock(), vec!["draft".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_saves_never_overlap() {
        let target = Arc::new(RecordingTarget {
            delay: Duration::from_millis(500),
            ..RecordingTarget::default()
        });
        let saver = saver(&target);

        saver.schedule(doc("a"));
        tokio::time::sleep(Duration::from_millis(900)).await;
        // "a" is mid-save here
        saver.schedule(doc("b"));
        saver.schedule(doc("c"));
        tokio::time::sleep(Duration::from_secs(3)).await;

        assert_eq!(*target.saved.lock(), vec!["a".to_string(), "c".to_string()]);
        assert_eq!(target.max_in_flight.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_abort_discards_pending_snapshot() {
        let target = Arc::new(RecordingTarget::default());
        let saver = saver(&target);

        saver.schedule(doc("gone"));
        saver.abort();
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(target.saved.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_is_reported() {
        let target = Arc::new(RecordingTarget { fail: true, ..RecordingTarget::default() });
        let saver = saver(&target);

        saver.schedule(doc("a"));
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(matches!(saver.status(), SaveStatus::Failed(_)));
        assert!(saver.status().is_settled());
        assert!(!SaveStatus::Pending.is_settled());
    }
}
