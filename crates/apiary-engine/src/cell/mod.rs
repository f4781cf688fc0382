//! Cell lifecycle service.
//!
//! [`CellService`] is the front door for everything done to a cell: create,
//! lookup, resource provisioning, and both deletion modes. It shares a
//! [`CellStatusRegistry`] with the [`CleanupWorker`] so deletion status is
//! visible to every operation, and feeds the worker over an in-process
//! queue.

use apiary_core::config::{CleanupConfig, LockConfig};
use apiary_store::store::UnitStore;
use tokio::sync::{broadcast, mpsc};
use uuid::Uuid;

use crate::cleanup::{CleanupJob, CleanupWorker};
use crate::lock::CellStatusRegistry;

mod bulk_delete;
mod create;
mod delete;
mod resource;

/// Front door for cell lifecycle operations.
#[derive(Debug, Clone)]
pub struct CellService<S> {
    store: S,
    registry: CellStatusRegistry,
    lock: LockConfig,
    queue: mpsc::UnboundedSender<CleanupJob>,
    completed: broadcast::Sender<Uuid>,
}

impl<S: UnitStore> CellService<S> {
    /// ## Summary
    /// Builds the service together with its cleanup worker. The worker must
    /// be spawned by the caller; until it runs, recursive deletions are
    /// accepted but never finish.
    #[must_use]
    pub fn new(store: S, lock: LockConfig, cleanup: CleanupConfig) -> (Self, CleanupWorker<S>) {
        let registry = CellStatusRegistry::new();
        let (queue, rx) = mpsc::unbounded_channel();
        let (completed, _) = broadcast::channel(16);
        let worker = CleanupWorker::new(
            store.clone(),
            registry.clone(),
            cleanup,
            rx,
            queue.clone(),
            completed.clone(),
        );
        let service = Self {
            store,
            registry,
            lock,
            queue,
            completed,
        };
        (service, worker)
    }

    /// Access to the backing store, mainly for tests seeding state.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Subscribes to cleanup completion notifications. Each completed
    /// recursive deletion broadcasts the cell's id.
    #[must_use]
    pub fn subscribe_cleanup(&self) -> broadcast::Receiver<Uuid> {
        self.completed.subscribe()
    }
}
