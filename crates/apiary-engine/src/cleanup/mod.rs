//! Background cleanup of cells marked for bulk deletion.
//!
//! The worker consumes [`CleanupJob`]s from an in-process queue and empties
//! one cell at a time in a fixed order: WebDAV trees, box records, event
//! log, each dependent kind, and finally the cell record itself. The record
//! goes away only once everything else reports zero. Transient store
//! failures are retried per step; a job whose step exhausts its retry budget
//! is logged and re-queued, so a cell never silently sticks around
//! half-deleted.

use std::future::Future;

use apiary_core::config::CleanupConfig;
use apiary_core::types::DependentKind;
use apiary_store::error::StoreResult;
use apiary_store::store::UnitStore;
use tokio::sync::{broadcast, mpsc};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::inspect::inspect;
use crate::lock::CellStatusRegistry;

/// Unit of work for the cleanup worker: one marked cell.
#[derive(Debug, Clone)]
pub struct CleanupJob {
    pub cell_id: Uuid,
    pub cell_name: String,
}

/// Background worker that empties marked cells.
pub struct CleanupWorker<S> {
    store: S,
    registry: CellStatusRegistry,
    config: CleanupConfig,
    rx: mpsc::UnboundedReceiver<CleanupJob>,
    requeue: mpsc::UnboundedSender<CleanupJob>,
    completed: broadcast::Sender<Uuid>,
}

impl<S: UnitStore> CleanupWorker<S> {
    pub(crate) fn new(
        store: S,
        registry: CellStatusRegistry,
        config: CleanupConfig,
        rx: mpsc::UnboundedReceiver<CleanupJob>,
        requeue: mpsc::UnboundedSender<CleanupJob>,
        completed: broadcast::Sender<Uuid>,
    ) -> Self {
        Self {
            store,
            registry,
            config,
            rx,
            requeue,
            completed,
        }
    }

    /// ## Summary
    /// Consumes cleanup jobs until the queue closes. Meant to be spawned on
    /// the runtime next to the service handing out the jobs.
    pub async fn run(mut self) {
        while let Some(job) = self.rx.recv().await {
            match self.make_empty(&job).await {
                Ok(()) => {
                    self.registry.clear(job.cell_id);
                    // Nobody listening is fine.
                    let _ = self.completed.send(job.cell_id);
                    tracing::info!(
                        cell_id = %job.cell_id,
                        cell_name = %job.cell_name,
                        "Cell bulk deletion completed"
                    );
                }
                Err(error) => {
                    tracing::error!(
                        cell_id = %job.cell_id,
                        cell_name = %job.cell_name,
                        %error,
                        "Cell cleanup failed, re-queueing"
                    );
                    tokio::time::sleep(self.config.interval()).await;
                    if self.requeue.send(job).is_err() {
                        tracing::error!("Cleanup queue closed while re-queueing");
                    }
                }
            }
        }
    }

    /// Removes everything owned by the cell, then the cell record.
    #[tracing::instrument(skip(self, job), fields(cell_id = %job.cell_id, cell_name = %job.cell_name))]
    async fn make_empty(&self, job: &CleanupJob) -> EngineResult<()> {
        let cell_id = job.cell_id;

        // WebDAV trees first; trees of distinct boxes are independent.
        let boxes = self
            .with_retry("boxes_for_cell", || self.store.boxes_for_cell(cell_id))
            .await?;
        let results = futures::future::join_all(boxes.iter().map(|b| {
            self.with_retry("delete_tree", || self.store.delete_tree(cell_id, b.id))
        }))
        .await;
        for result in results {
            result?;
        }
        tracing::debug!("WebDAV tree deletion end");

        self.with_retry("remove_boxes", || self.store.remove_boxes(cell_id))
            .await?;

        self.with_retry("delete_event_log", || self.store.delete_event_log(cell_id))
            .await?;
        tracing::debug!("Event log deletion end");

        for kind in DependentKind::ALL {
            let removed = self
                .with_retry(kind.as_str(), || {
                    self.store.delete_dependents(cell_id, kind)
                })
                .await?;
            if removed > 0 {
                tracing::debug!(kind = %kind, removed, "Dependent record deletion end");
            }
        }

        // The record goes away only once nothing else remains.
        let graph = inspect(&self.store, cell_id).await?;
        if !graph.is_clean() {
            return Err(EngineError::StoreError(
                apiary_store::error::StoreError::Unavailable(
                    "dependent resources remained after cleanup pass".to_string(),
                ),
            ));
        }
        self.with_retry("remove_cell", || self.store.remove_cell(cell_id))
            .await?;

        Ok(())
    }

    /// Runs one cleanup step, retrying transient failures up to the
    /// configured budget.
    async fn with_retry<T, F, Fut>(&self, step: &str, op: F) -> EngineResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = StoreResult<T>>,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(error) if error.is_transient() && attempt < self.config.retry_max => {
                    attempt += 1;
                    tracing::warn!(step, attempt, %error, "Cleanup step failed, retrying");
                    tokio::time::sleep(self.config.interval()).await;
                }
                Err(error) => return Err(error.into()),
            }
        }
    }
}
