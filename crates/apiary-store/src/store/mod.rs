//! Store interfaces consumed by the deletion engine.
//!
//! Every backend (cell metadata, boxes, WebDAV trees, control records, and
//! event logs) is reached through one of these traits. The engine is
//! generic over a [`UnitStore`], so a durable backend can replace
//! [`memory::MemoryStore`] without touching engine code.

use std::future::Future;

use apiary_core::types::DependentKind;
use uuid::Uuid;

use crate::error::StoreResult;
use crate::model::boxes::{BoxRecord, NewBox};
use crate::model::cell::{CellRecord, NewCell};
use crate::model::dav::{DavEntry, NewDavEntry};
use crate::model::dependent::{DependentRecord, NewDependent};
use crate::model::event::Event;

pub mod memory;

/// Cell metadata records.
pub trait CellStore: Send + Sync {
    /// Creates a cell and provisions its main box in the same step.
    ///
    /// Fails with `AlreadyExists` when the exact name is already taken by a
    /// cell in any status: a cell marked for bulk deletion still occupies
    /// its name until cleanup completes.
    fn create_cell(
        &self,
        new_cell: NewCell<'_>,
    ) -> impl Future<Output = StoreResult<CellRecord>> + Send;

    /// Exact-case lookup. Cells marked for bulk deletion are not returned.
    fn cell_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = StoreResult<Option<CellRecord>>> + Send;

    /// Lookup by id, returning marked cells too. Used by the cleanup worker.
    fn cell_by_id(
        &self,
        id: Uuid,
    ) -> impl Future<Output = StoreResult<Option<CellRecord>>> + Send;

    /// Atomically flips the cell into `BulkDeletion` status, hiding it from
    /// name lookups. Returns `false` when the mark was already set.
    fn mark_bulk_deletion(&self, id: Uuid) -> impl Future<Output = StoreResult<bool>> + Send;

    /// Removes the cell record. Idempotent: removing an absent record is not
    /// an error, so the cleanup worker can safely retry.
    fn remove_cell(&self, id: Uuid) -> impl Future<Output = StoreResult<()>> + Send;
}

/// Box records of a cell.
pub trait BoxStore: Send + Sync {
    fn create_box(&self, new_box: NewBox<'_>)
    -> impl Future<Output = StoreResult<BoxRecord>> + Send;

    fn boxes_for_cell(
        &self,
        cell_id: Uuid,
    ) -> impl Future<Output = StoreResult<Vec<BoxRecord>>> + Send;

    /// Removes every box record of the cell, returning the removed count.
    fn remove_boxes(&self, cell_id: Uuid) -> impl Future<Output = StoreResult<u64>> + Send;
}

/// WebDAV file trees under the boxes of a cell.
pub trait DavStorage: Send + Sync {
    fn put_entry(
        &self,
        entry: NewDavEntry<'_>,
    ) -> impl Future<Output = StoreResult<DavEntry>> + Send;

    /// Entries of one box, ordered by path.
    fn list_entries(
        &self,
        cell_id: Uuid,
        box_id: Uuid,
    ) -> impl Future<Output = StoreResult<Vec<DavEntry>>> + Send;

    /// Total entry count across all boxes of the cell.
    fn count_entries(&self, cell_id: Uuid) -> impl Future<Output = StoreResult<u64>> + Send;

    /// Removes the whole tree of one box, returning the removed count.
    fn delete_tree(
        &self,
        cell_id: Uuid,
        box_id: Uuid,
    ) -> impl Future<Output = StoreResult<u64>> + Send;
}

/// Control records (Account, Role, Relation, ExtCell, ExtRole, SentMessage,
/// ReceivedMessage) owned by a cell.
pub trait DependentStore: Send + Sync {
    fn create_dependent(
        &self,
        new_dependent: NewDependent<'_>,
    ) -> impl Future<Output = StoreResult<DependentRecord>> + Send;

    fn count_dependents(
        &self,
        cell_id: Uuid,
        kind: DependentKind,
    ) -> impl Future<Output = StoreResult<u64>> + Send;

    /// Removes every record of one kind for the cell, returning the count.
    fn delete_dependents(
        &self,
        cell_id: Uuid,
        kind: DependentKind,
    ) -> impl Future<Output = StoreResult<u64>> + Send;

    /// Removes a single record by id.
    fn remove_dependent(&self, id: Uuid) -> impl Future<Output = StoreResult<()>> + Send;
}

/// Per-cell event logs.
pub trait EventLogStore: Send + Sync {
    fn append_event(
        &self,
        cell_id: Uuid,
        event: Event,
    ) -> impl Future<Output = StoreResult<()>> + Send;

    fn has_event_log(&self, cell_id: Uuid) -> impl Future<Output = StoreResult<bool>> + Send;

    /// Removes the cell's event log. Idempotent.
    fn delete_event_log(&self, cell_id: Uuid) -> impl Future<Output = StoreResult<()>> + Send;
}

/// Everything the engine needs from a backend, in one bound.
pub trait UnitStore:
    CellStore + BoxStore + DavStorage + DependentStore + EventLogStore + Clone + Send + Sync + 'static
{
}

impl<T> UnitStore for T where
    T: CellStore
        + BoxStore
        + DavStorage
        + DependentStore
        + EventLogStore
        + Clone
        + Send
        + Sync
        + 'static
{
}
