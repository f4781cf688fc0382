//! Recursive (bulk) cell deletion.

use apiary_core::constants::RECURSIVE_HEADER;
use apiary_store::store::UnitStore;

use crate::auth::access::check_cell_access;
use crate::auth::subject::UnitSubject;
use crate::cleanup::CleanupJob;
use crate::error::{EngineError, EngineResult};
use crate::lock::AccessStatus;

use super::CellService;

impl<S: UnitStore> CellService<S> {
    /// ## Summary
    /// Deletes a cell and everything inside it. The cell is atomically
    /// flipped into bulk-deletion status and the call returns as soon as the
    /// cleanup job is queued; from that moment the name reads as absent, yet
    /// stays reserved until the worker removes the record.
    ///
    /// The recursive control must carry the literal value `"true"`; any
    /// other value, or its absence, fails the precondition. This keeps an
    /// unscoped delete from silently destroying a populated cell.
    ///
    /// ## Errors
    /// - `PreconditionFailed` when the recursive control is not `"true"`
    /// - `NotFound` when no visible cell carries the name, including a cell
    ///   already marked by an earlier recursive request
    /// - `NotAuthenticated` / `Forbidden` per the cell access rules
    /// - `TooManyConcurrent` when in-flight operations do not drain in time
    /// - `QueueClosed` when the unit is shutting down
    ///
    /// ## Side Effects
    /// Marks the cell record and enqueues a cleanup job.
    #[tracing::instrument(skip(self, subject), fields(subject = %subject))]
    pub async fn bulk_delete_cell(
        &self,
        subject: &UnitSubject,
        cell_name: &str,
        recursive: Option<&str>,
        unit_user_override: Option<&str>,
    ) -> EngineResult<()> {
        if recursive != Some("true") {
            return Err(EngineError::PreconditionFailed(RECURSIVE_HEADER));
        }

        let effective = subject.clone().downgrade(unit_user_override);
        let cell = self.get_cell(cell_name).await?;
        check_cell_access(&effective, cell.owner.as_deref())?;

        let guard = match self.registry.begin_deletion(cell.id) {
            Ok(guard) => guard,
            Err(AccessStatus::BulkDeletion) => {
                return Err(EngineError::NotFound(format!("Cell: {cell_name}")));
            }
            Err(_) => return Err(EngineError::TooManyConcurrent),
        };
        if !self
            .registry
            .wait_idle(cell.id, self.lock.retry_times, self.lock.interval())
            .await
        {
            return Err(EngineError::TooManyConcurrent);
        }

        // Losing the mark race means another request got here first.
        if !self.store.mark_bulk_deletion(cell.id).await? {
            return Err(EngineError::NotFound(format!("Cell: {cell_name}")));
        }
        guard.commit_bulk();

        let job = CleanupJob {
            cell_id: cell.id,
            cell_name: cell.name.clone(),
        };
        if self.queue.send(job).is_err() {
            return Err(EngineError::QueueClosed);
        }
        tracing::info!(cell_id = %cell.id, cell_name, "Cell marked for bulk deletion");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use apiary_core::config::{CleanupConfig, LockConfig};
    use apiary_store::store::CellStore;
    use apiary_store::store::memory::MemoryStore;

    use super::*;
    use crate::cleanup::CleanupWorker;

    fn service() -> (CellService<MemoryStore>, CleanupWorker<MemoryStore>) {
        let (service, worker) = CellService::new(
            MemoryStore::new(),
            LockConfig {
                retry_times: 2,
                retry_interval_ms: 1,
            },
            CleanupConfig {
                retry_max: 2,
                retry_interval_ms: 1,
            },
        );
        (service, worker)
    }

    #[test_log::test(tokio::test)]
    async fn recursive_control_must_be_literal_true() {
        let (service, _worker) = service();
        service
            .create_cell(&UnitSubject::UnitMaster, "cell1", None)
            .await
            .unwrap();

        for value in [None, Some("TRUE"), Some("1"), Some("yes"), Some("")] {
            let err = service
                .bulk_delete_cell(&UnitSubject::UnitMaster, "cell1", value, None)
                .await
                .unwrap_err();
            assert_eq!(err.status_code(), 412);
        }
        // The cell is untouched.
        service.get_cell("cell1").await.unwrap();
    }

    #[test_log::test(tokio::test)]
    async fn marked_cell_reads_as_absent() {
        let (service, _worker) = service();
        let cell = service
            .create_cell(&UnitSubject::UnitMaster, "cell1", None)
            .await
            .unwrap();

        service
            .bulk_delete_cell(&UnitSubject::UnitMaster, "cell1", Some("true"), None)
            .await
            .unwrap();

        assert_eq!(
            service.get_cell("cell1").await.unwrap_err().status_code(),
            404
        );
        // The record itself survives until the worker runs.
        assert!(
            service
                .store()
                .cell_by_id(cell.id)
                .await
                .unwrap()
                .is_some()
        );
    }

    #[test_log::test(tokio::test)]
    async fn second_submission_is_not_found() {
        let (service, _worker) = service();
        service
            .create_cell(&UnitSubject::UnitMaster, "cell1", None)
            .await
            .unwrap();

        service
            .bulk_delete_cell(&UnitSubject::UnitMaster, "cell1", Some("true"), None)
            .await
            .unwrap();
        let err = service
            .bulk_delete_cell(&UnitSubject::UnitMaster, "cell1", Some("true"), None)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[test_log::test(tokio::test)]
    async fn owner_may_bulk_delete_others_may_not() {
        let (service, _worker) = service();
        service
            .create_cell(&UnitSubject::UnitMaster, "cell1", Some("vet"))
            .await
            .unwrap();

        let err = service
            .bulk_delete_cell(
                &UnitSubject::UnitUser("hmc".to_string()),
                "cell1",
                Some("true"),
                None,
            )
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 403);

        service
            .bulk_delete_cell(
                &UnitSubject::UnitUser("vet".to_string()),
                "cell1",
                Some("true"),
                None,
            )
            .await
            .unwrap();
    }
}
