//! In-process cell access registry.
//!
//! Tracks in-flight operations per cell and the cell's deletion status. A
//! deletion first parks the cell in [`AccessStatus::Deleting`], which stops
//! new operations from starting, then waits for the in-flight count to
//! drain before touching any record. Recursive deletion leaves the cell in
//! [`AccessStatus::BulkDeletion`] until the cleanup worker finishes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use uuid::Uuid;

/// Deletion-related status of a cell, as seen by this unit process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessStatus {
    Normal,
    /// A synchronous or recursive deletion is validating/draining.
    Deleting,
    /// The cell is marked; background cleanup is pending or running.
    BulkDeletion,
}

#[derive(Debug, Default)]
struct CellAccess {
    refs: u32,
    status: Option<AccessStatus>,
}

impl CellAccess {
    fn status(&self) -> AccessStatus {
        self.status.unwrap_or(AccessStatus::Normal)
    }
}

type Registry = HashMap<Uuid, CellAccess>;

/// Shared registry of per-cell in-flight counts and deletion status.
#[derive(Debug, Clone, Default)]
pub struct CellStatusRegistry {
    inner: Arc<Mutex<Registry>>,
}

impl CellStatusRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Registry> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers an in-flight operation on the cell.
    ///
    /// ## Errors
    /// Returns the blocking status when a deletion owns the cell.
    pub fn begin(&self, cell_id: Uuid) -> Result<CellOpGuard, AccessStatus> {
        let mut registry = self.lock();
        let access = registry.entry(cell_id).or_default();
        match access.status() {
            AccessStatus::Normal => {
                access.refs += 1;
                Ok(CellOpGuard {
                    registry: self.clone(),
                    cell_id,
                })
            }
            blocked => Err(blocked),
        }
    }

    /// Claims the cell for deletion, stopping new operations.
    ///
    /// ## Errors
    /// Returns the current status when another deletion already owns the cell.
    pub fn begin_deletion(&self, cell_id: Uuid) -> Result<DeletionGuard, AccessStatus> {
        let mut registry = self.lock();
        let access = registry.entry(cell_id).or_default();
        match access.status() {
            AccessStatus::Normal => {
                access.status = Some(AccessStatus::Deleting);
                Ok(DeletionGuard {
                    registry: self.clone(),
                    cell_id,
                    committed: false,
                })
            }
            blocked => Err(blocked),
        }
    }

    /// Current status of the cell.
    #[must_use]
    pub fn status(&self, cell_id: Uuid) -> AccessStatus {
        self.lock()
            .get(&cell_id)
            .map_or(AccessStatus::Normal, CellAccess::status)
    }

    /// In-flight operation count of the cell.
    #[must_use]
    pub fn in_flight(&self, cell_id: Uuid) -> u32 {
        self.lock().get(&cell_id).map_or(0, |a| a.refs)
    }

    /// Waits until the cell has no in-flight operations, polling up to
    /// `retry_times` with `interval` between polls. Returns `false` when the
    /// cell is still busy after the whole budget.
    pub async fn wait_idle(&self, cell_id: Uuid, retry_times: u32, interval: Duration) -> bool {
        for _ in 0..=retry_times {
            if self.in_flight(cell_id) == 0 {
                return true;
            }
            tokio::time::sleep(interval).await;
        }
        self.in_flight(cell_id) == 0
    }

    /// Drops all state for the cell. Called once cleanup fully completes.
    pub fn clear(&self, cell_id: Uuid) {
        self.lock().remove(&cell_id);
    }

    fn end_op(&self, cell_id: Uuid) {
        let mut registry = self.lock();
        if let Some(access) = registry.get_mut(&cell_id) {
            access.refs = access.refs.saturating_sub(1);
            if access.refs == 0 && access.status.is_none() {
                registry.remove(&cell_id);
            }
        }
    }

    fn release_deletion(&self, cell_id: Uuid) {
        let mut registry = self.lock();
        if let Some(access) = registry.get_mut(&cell_id)
            && access.status() == AccessStatus::Deleting
        {
            access.status = None;
            if access.refs == 0 {
                registry.remove(&cell_id);
            }
        }
    }

    fn set_bulk_deletion(&self, cell_id: Uuid) {
        let mut registry = self.lock();
        registry.entry(cell_id).or_default().status = Some(AccessStatus::BulkDeletion);
    }
}

/// RAII guard for one in-flight cell operation.
#[derive(Debug)]
pub struct CellOpGuard {
    registry: CellStatusRegistry,
    cell_id: Uuid,
}

impl Drop for CellOpGuard {
    fn drop(&mut self) {
        self.registry.end_op(self.cell_id);
    }
}

/// RAII claim on a cell's deletion.
///
/// Dropping the guard without committing restores the cell to normal, so a
/// failed precondition or conflict leaves no trace.
#[derive(Debug)]
pub struct DeletionGuard {
    registry: CellStatusRegistry,
    cell_id: Uuid,
    committed: bool,
}

impl DeletionGuard {
    /// Finishes a synchronous deletion: the cell is gone, drop its state.
    pub fn finish(mut self) {
        self.committed = true;
        self.registry.clear(self.cell_id);
    }

    /// Switches the claim into the sticky bulk-deletion status that stays
    /// until the cleanup worker completes.
    pub fn commit_bulk(mut self) {
        self.committed = true;
        self.registry.set_bulk_deletion(self.cell_id);
    }
}

impl Drop for DeletionGuard {
    fn drop(&mut self) {
        if !self.committed {
            self.registry.release_deletion(self.cell_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_counts_and_releases() {
        let registry = CellStatusRegistry::new();
        let cell_id = Uuid::new_v4();

        let guard = registry.begin(cell_id).unwrap();
        assert_eq!(registry.in_flight(cell_id), 1);
        drop(guard);
        assert_eq!(registry.in_flight(cell_id), 0);
    }

    #[test]
    fn deletion_blocks_new_operations() {
        let registry = CellStatusRegistry::new();
        let cell_id = Uuid::new_v4();

        let guard = registry.begin_deletion(cell_id).unwrap();
        assert_eq!(registry.begin(cell_id).unwrap_err(), AccessStatus::Deleting);
        assert_eq!(
            registry.begin_deletion(cell_id).unwrap_err(),
            AccessStatus::Deleting
        );
        drop(guard);
        // Uncommitted deletion rolls back.
        assert!(registry.begin(cell_id).is_ok());
    }

    #[test]
    fn committed_bulk_deletion_is_sticky() {
        let registry = CellStatusRegistry::new();
        let cell_id = Uuid::new_v4();

        registry.begin_deletion(cell_id).unwrap().commit_bulk();
        assert_eq!(registry.status(cell_id), AccessStatus::BulkDeletion);
        assert_eq!(
            registry.begin(cell_id).unwrap_err(),
            AccessStatus::BulkDeletion
        );

        registry.clear(cell_id);
        assert_eq!(registry.status(cell_id), AccessStatus::Normal);
    }

    #[tokio::test]
    async fn wait_idle_observes_drain() {
        let registry = CellStatusRegistry::new();
        let cell_id = Uuid::new_v4();

        let guard = registry.begin(cell_id).unwrap();
        assert!(
            !registry
                .wait_idle(cell_id, 2, Duration::from_millis(1))
                .await
        );
        drop(guard);
        assert!(
            registry
                .wait_idle(cell_id, 2, Duration::from_millis(1))
                .await
        );
    }
}
