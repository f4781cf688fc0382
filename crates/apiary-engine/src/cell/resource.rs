//! Resource provisioning inside a cell.
//!
//! Every mutation registers itself in the status registry first, so a
//! deletion that has claimed the cell turns new work away instead of racing
//! against the precondition check.

use apiary_core::types::DependentKind;
use apiary_store::model::boxes::{BoxRecord, NewBox};
use apiary_store::model::dav::{DavEntry, DavEntryKind, NewDavEntry};
use apiary_store::model::dependent::{DependentRecord, NewDependent};
use apiary_store::model::event::Event;
use apiary_store::store::UnitStore;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::lock::{AccessStatus, CellOpGuard};

use super::CellService;

impl<S: UnitStore> CellService<S> {
    /// Registers an in-flight operation on the cell, or reports why none may
    /// start. A cell owned by a deletion is busy; a marked cell no longer
    /// exists as far as callers are concerned.
    fn claim(&self, cell_id: Uuid, cell_name: &str) -> EngineResult<CellOpGuard> {
        match self.registry.begin(cell_id) {
            Ok(guard) => Ok(guard),
            Err(AccessStatus::BulkDeletion) => {
                Err(EngineError::NotFound(format!("Cell: {cell_name}")))
            }
            Err(_) => Err(EngineError::TooManyConcurrent),
        }
    }

    /// ## Summary
    /// Creates a box under the cell.
    ///
    /// ## Errors
    /// - `NotFound` when the cell does not exist or is marked for deletion
    /// - `AlreadyExists` for a duplicate box name
    /// - `TooManyConcurrent` while a deletion owns the cell
    #[tracing::instrument(skip(self))]
    pub async fn create_box(&self, cell_name: &str, box_name: &str) -> EngineResult<BoxRecord> {
        let cell = self.get_cell(cell_name).await?;
        let _guard = self.claim(cell.id, cell_name)?;
        Ok(self
            .store
            .create_box(NewBox {
                cell_id: cell.id,
                name: box_name,
            })
            .await?)
    }

    /// ## Summary
    /// Stores a file under one of the cell's boxes.
    ///
    /// ## Errors
    /// - `NotFound` when the cell or the box does not exist
    /// - `TooManyConcurrent` while a deletion owns the cell
    #[tracing::instrument(skip(self, content))]
    pub async fn put_file(
        &self,
        cell_name: &str,
        box_name: &str,
        path: &str,
        content: &[u8],
    ) -> EngineResult<DavEntry> {
        self.put_dav_entry(cell_name, box_name, path, DavEntryKind::File, content)
            .await
    }

    /// ## Summary
    /// Creates a collection under one of the cell's boxes.
    ///
    /// ## Errors
    /// - `NotFound` when the cell or the box does not exist
    /// - `TooManyConcurrent` while a deletion owns the cell
    #[tracing::instrument(skip(self))]
    pub async fn make_collection(
        &self,
        cell_name: &str,
        box_name: &str,
        path: &str,
    ) -> EngineResult<DavEntry> {
        self.put_dav_entry(cell_name, box_name, path, DavEntryKind::Collection, &[])
            .await
    }

    async fn put_dav_entry(
        &self,
        cell_name: &str,
        box_name: &str,
        path: &str,
        kind: DavEntryKind,
        content: &[u8],
    ) -> EngineResult<DavEntry> {
        let cell = self.get_cell(cell_name).await?;
        let _guard = self.claim(cell.id, cell_name)?;
        let target = self
            .store
            .boxes_for_cell(cell.id)
            .await?
            .into_iter()
            .find(|b| b.name == box_name)
            .ok_or_else(|| EngineError::NotFound(format!("Box: {box_name}")))?;
        Ok(self
            .store
            .put_entry(NewDavEntry {
                cell_id: cell.id,
                box_id: target.id,
                path,
                kind,
                content,
            })
            .await?)
    }

    /// ## Summary
    /// Creates a control record (Account, Role, ...) under the cell.
    ///
    /// ## Errors
    /// - `NotFound` when the cell does not exist or is marked for deletion
    /// - `TooManyConcurrent` while a deletion owns the cell
    #[tracing::instrument(skip(self))]
    pub async fn create_dependent(
        &self,
        cell_name: &str,
        kind: DependentKind,
        name: &str,
    ) -> EngineResult<DependentRecord> {
        let cell = self.get_cell(cell_name).await?;
        let _guard = self.claim(cell.id, cell_name)?;
        Ok(self
            .store
            .create_dependent(NewDependent {
                cell_id: cell.id,
                kind,
                name,
            })
            .await?)
    }

    /// ## Summary
    /// Removes a single control record by id.
    ///
    /// ## Errors
    /// - `NotFound` when the cell or the record does not exist
    /// - `TooManyConcurrent` while a deletion owns the cell
    #[tracing::instrument(skip(self))]
    pub async fn remove_dependent(&self, cell_name: &str, id: Uuid) -> EngineResult<()> {
        let cell = self.get_cell(cell_name).await?;
        let _guard = self.claim(cell.id, cell_name)?;
        Ok(self.store.remove_dependent(id).await?)
    }

    /// ## Summary
    /// Appends an entry to the cell's event log, creating the log on first
    /// write.
    ///
    /// ## Errors
    /// - `NotFound` when the cell does not exist or is marked for deletion
    /// - `TooManyConcurrent` while a deletion owns the cell
    #[tracing::instrument(skip(self, event))]
    pub async fn post_event(&self, cell_name: &str, event: Event) -> EngineResult<()> {
        let cell = self.get_cell(cell_name).await?;
        let _guard = self.claim(cell.id, cell_name)?;
        Ok(self.store.append_event(cell.id, event).await?)
    }
}

#[cfg(test)]
mod tests {
    use apiary_core::config::{CleanupConfig, LockConfig};
    use apiary_store::store::memory::MemoryStore;
    use apiary_store::store::EventLogStore;

    use crate::auth::subject::UnitSubject;

    use super::*;

    async fn service_with_cell() -> CellService<MemoryStore> {
        let (service, _worker) = CellService::new(
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
        service
            .create_cell(&UnitSubject::UnitMaster, "cell1", None)
            .await
            .unwrap();
        service
    }

    #[test_log::test(tokio::test)]
    async fn put_file_needs_an_existing_box() {
        let service = service_with_cell().await;

        let err = service
            .put_file("cell1", "nosuchbox", "doc.txt", b"hello")
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);

        service.create_box("cell1", "testBox").await.unwrap();
        let entry = service
            .put_file("cell1", "testBox", "doc.txt", b"hello")
            .await
            .unwrap();
        assert_eq!(entry.path, "doc.txt");
    }

    #[test_log::test(tokio::test)]
    async fn collections_are_dav_entries_too() {
        let service = service_with_cell().await;
        service.create_box("cell1", "testBox").await.unwrap();

        let col = service
            .make_collection("cell1", "testBox", "col")
            .await
            .unwrap();
        assert_eq!(col.kind, DavEntryKind::Collection);
        assert!(col.content.is_empty());

        service
            .put_file("cell1", "testBox", "col/doc.txt", b"hello")
            .await
            .unwrap();
        let cell = service.get_cell("cell1").await.unwrap();
        use apiary_store::store::DavStorage;
        assert_eq!(service.store().count_entries(cell.id).await.unwrap(), 2);
    }

    #[test_log::test(tokio::test)]
    async fn events_create_the_log_lazily() {
        let service = service_with_cell().await;
        let cell = service.get_cell("cell1").await.unwrap();
        assert!(!service.store().has_event_log(cell.id).await.unwrap());

        service
            .post_event(
                "cell1",
                Event {
                    level: "INFO".to_string(),
                    action: "PUT".to_string(),
                    object: "/doc.txt".to_string(),
                    result: "201".to_string(),
                },
            )
            .await
            .unwrap();
        assert!(service.store().has_event_log(cell.id).await.unwrap());
    }

    #[test_log::test(tokio::test)]
    async fn resources_against_missing_cell_are_not_found() {
        let service = service_with_cell().await;
        let err = service
            .create_dependent("nosuchcell", DependentKind::Account, "hogehuga")
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
    }
}
