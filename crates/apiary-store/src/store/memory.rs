//! In-memory reference store.
//!
//! Backs the engine with plain maps behind one `RwLock`, which makes every
//! store call atomic; in particular the bulk-deletion mark flips in the
//! same critical section that name lookups read from.
//!
//! Supports transient-fault injection so worker retry behavior can be
//! exercised in tests.

use std::collections::HashMap;
use std::sync::Arc;

use apiary_core::constants::MAIN_BOX_NAME;
use apiary_core::types::{CellStatus, DependentKind};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{BoxStore, CellStore, DavStorage, DependentStore, EventLogStore};
use crate::error::{StoreError, StoreResult};
use crate::etag::cell_etag;
use crate::model::boxes::{BoxRecord, NewBox};
use crate::model::cell::{CellRecord, NewCell};
use crate::model::dav::{DavEntry, NewDavEntry};
use crate::model::dependent::{DependentRecord, NewDependent};
use crate::model::event::Event;

#[derive(Debug, Default)]
struct State {
    cells: HashMap<Uuid, CellRecord>,
    boxes: HashMap<Uuid, BoxRecord>,
    dav_entries: HashMap<Uuid, DavEntry>,
    dependents: HashMap<Uuid, DependentRecord>,
    event_logs: HashMap<Uuid, Vec<Event>>,
    faults: HashMap<String, u32>,
}

/// Reference implementation of the store traits.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<State>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `count` calls of the named operation fail with
    /// `StoreError::Unavailable`. Operation keys are the method names, with
    /// `delete_dependents` additionally keyed per kind, e.g.
    /// `"delete_dependents:Account"`.
    pub async fn inject_transient_failures(&self, op: &str, count: u32) {
        self.inner.write().await.faults.insert(op.to_string(), count);
    }
}

fn take_fault(state: &mut State, op: &str) -> StoreResult<()> {
    if let Some(remaining) = state.faults.get_mut(op)
        && *remaining > 0
    {
        *remaining -= 1;
        return Err(StoreError::Unavailable(format!(
            "injected transient failure: {op}"
        )));
    }
    Ok(())
}

impl CellStore for MemoryStore {
    #[tracing::instrument(skip(self))]
    async fn create_cell(&self, new_cell: NewCell<'_>) -> StoreResult<CellRecord> {
        let mut state = self.inner.write().await;
        if state.cells.values().any(|c| c.name == new_cell.name) {
            return Err(StoreError::AlreadyExists {
                kind: "Cell",
                key: new_cell.name.to_string(),
            });
        }

        let id = Uuid::new_v4();
        let now = chrono::Utc::now();
        let record = CellRecord {
            id,
            name: new_cell.name.to_string(),
            owner: new_cell.owner.map(ToString::to_string),
            status: CellStatus::Normal,
            etag: cell_etag(id, 1),
            revision: 1,
            created_at: now,
            updated_at: now,
        };
        state.cells.insert(id, record.clone());

        // Main box comes with the cell.
        let box_id = Uuid::new_v4();
        state.boxes.insert(
            box_id,
            BoxRecord {
                id: box_id,
                cell_id: id,
                name: MAIN_BOX_NAME.to_string(),
                main_box: true,
                created_at: now,
            },
        );

        tracing::debug!(cell_id = %id, name = %record.name, "Cell created");
        Ok(record)
    }

    async fn cell_by_name(&self, name: &str) -> StoreResult<Option<CellRecord>> {
        let state = self.inner.read().await;
        Ok(state
            .cells
            .values()
            .find(|c| c.name == name && c.status == CellStatus::Normal)
            .cloned())
    }

    async fn cell_by_id(&self, id: Uuid) -> StoreResult<Option<CellRecord>> {
        let state = self.inner.read().await;
        Ok(state.cells.get(&id).cloned())
    }

    #[tracing::instrument(skip(self))]
    async fn mark_bulk_deletion(&self, id: Uuid) -> StoreResult<bool> {
        let mut state = self.inner.write().await;
        let cell = state.cells.get_mut(&id).ok_or(StoreError::NotFound {
            kind: "Cell",
            key: id.to_string(),
        })?;
        if cell.status == CellStatus::BulkDeletion {
            return Ok(false);
        }
        cell.status = CellStatus::BulkDeletion;
        cell.revision += 1;
        cell.etag = cell_etag(cell.id, cell.revision);
        cell.updated_at = chrono::Utc::now();
        Ok(true)
    }

    #[tracing::instrument(skip(self))]
    async fn remove_cell(&self, id: Uuid) -> StoreResult<()> {
        let mut state = self.inner.write().await;
        take_fault(&mut state, "remove_cell")?;
        state.cells.remove(&id);
        Ok(())
    }
}

impl BoxStore for MemoryStore {
    #[tracing::instrument(skip(self))]
    async fn create_box(&self, new_box: NewBox<'_>) -> StoreResult<BoxRecord> {
        let mut state = self.inner.write().await;
        if state
            .boxes
            .values()
            .any(|b| b.cell_id == new_box.cell_id && b.name == new_box.name)
        {
            return Err(StoreError::AlreadyExists {
                kind: "Box",
                key: new_box.name.to_string(),
            });
        }
        let record = BoxRecord {
            id: Uuid::new_v4(),
            cell_id: new_box.cell_id,
            name: new_box.name.to_string(),
            main_box: false,
            created_at: chrono::Utc::now(),
        };
        state.boxes.insert(record.id, record.clone());
        Ok(record)
    }

    async fn boxes_for_cell(&self, cell_id: Uuid) -> StoreResult<Vec<BoxRecord>> {
        let state = self.inner.read().await;
        let mut boxes: Vec<BoxRecord> = state
            .boxes
            .values()
            .filter(|b| b.cell_id == cell_id)
            .cloned()
            .collect();
        boxes.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(boxes)
    }

    #[tracing::instrument(skip(self))]
    async fn remove_boxes(&self, cell_id: Uuid) -> StoreResult<u64> {
        let mut state = self.inner.write().await;
        take_fault(&mut state, "remove_boxes")?;
        let before = state.boxes.len();
        state.boxes.retain(|_, b| b.cell_id != cell_id);
        Ok((before - state.boxes.len()) as u64)
    }
}

impl DavStorage for MemoryStore {
    #[tracing::instrument(skip(self, entry), fields(path = entry.path))]
    async fn put_entry(&self, entry: NewDavEntry<'_>) -> StoreResult<DavEntry> {
        let mut state = self.inner.write().await;
        if state.dav_entries.values().any(|e| {
            e.cell_id == entry.cell_id && e.box_id == entry.box_id && e.path == entry.path
        }) {
            return Err(StoreError::AlreadyExists {
                kind: "DavEntry",
                key: entry.path.to_string(),
            });
        }
        let record = DavEntry {
            id: Uuid::new_v4(),
            cell_id: entry.cell_id,
            box_id: entry.box_id,
            path: entry.path.to_string(),
            kind: entry.kind,
            content: entry.content.to_vec(),
            created_at: chrono::Utc::now(),
        };
        state.dav_entries.insert(record.id, record.clone());
        Ok(record)
    }

    async fn list_entries(&self, cell_id: Uuid, box_id: Uuid) -> StoreResult<Vec<DavEntry>> {
        let state = self.inner.read().await;
        let mut entries: Vec<DavEntry> = state
            .dav_entries
            .values()
            .filter(|e| e.cell_id == cell_id && e.box_id == box_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }

    async fn count_entries(&self, cell_id: Uuid) -> StoreResult<u64> {
        let state = self.inner.read().await;
        Ok(state
            .dav_entries
            .values()
            .filter(|e| e.cell_id == cell_id)
            .count() as u64)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_tree(&self, cell_id: Uuid, box_id: Uuid) -> StoreResult<u64> {
        let mut state = self.inner.write().await;
        take_fault(&mut state, "delete_tree")?;
        let before = state.dav_entries.len();
        state
            .dav_entries
            .retain(|_, e| !(e.cell_id == cell_id && e.box_id == box_id));
        Ok((before - state.dav_entries.len()) as u64)
    }
}

impl DependentStore for MemoryStore {
    #[tracing::instrument(skip(self))]
    async fn create_dependent(&self, new_dependent: NewDependent<'_>) -> StoreResult<DependentRecord> {
        let mut state = self.inner.write().await;
        if state.dependents.values().any(|d| {
            d.cell_id == new_dependent.cell_id
                && d.kind == new_dependent.kind
                && d.name == new_dependent.name
        }) {
            return Err(StoreError::AlreadyExists {
                kind: new_dependent.kind.as_str(),
                key: new_dependent.name.to_string(),
            });
        }
        let record = DependentRecord {
            id: Uuid::new_v4(),
            cell_id: new_dependent.cell_id,
            kind: new_dependent.kind,
            name: new_dependent.name.to_string(),
            created_at: chrono::Utc::now(),
        };
        state.dependents.insert(record.id, record.clone());
        Ok(record)
    }

    async fn count_dependents(&self, cell_id: Uuid, kind: DependentKind) -> StoreResult<u64> {
        let state = self.inner.read().await;
        Ok(state
            .dependents
            .values()
            .filter(|d| d.cell_id == cell_id && d.kind == kind)
            .count() as u64)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_dependents(&self, cell_id: Uuid, kind: DependentKind) -> StoreResult<u64> {
        let mut state = self.inner.write().await;
        take_fault(&mut state, &format!("delete_dependents:{kind}"))?;
        let before = state.dependents.len();
        state
            .dependents
            .retain(|_, d| !(d.cell_id == cell_id && d.kind == kind));
        Ok((before - state.dependents.len()) as u64)
    }

    #[tracing::instrument(skip(self))]
    async fn remove_dependent(&self, id: Uuid) -> StoreResult<()> {
        let mut state = self.inner.write().await;
        state
            .dependents
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound {
                kind: "DependentRecord",
                key: id.to_string(),
            })
    }
}

impl EventLogStore for MemoryStore {
    async fn append_event(&self, cell_id: Uuid, event: Event) -> StoreResult<()> {
        let mut state = self.inner.write().await;
        state.event_logs.entry(cell_id).or_default().push(event);
        Ok(())
    }

    async fn has_event_log(&self, cell_id: Uuid) -> StoreResult<bool> {
        let state = self.inner.read().await;
        Ok(state.event_logs.contains_key(&cell_id))
    }

    #[tracing::instrument(skip(self))]
    async fn delete_event_log(&self, cell_id: Uuid) -> StoreResult<()> {
        let mut state = self.inner.write().await;
        take_fault(&mut state, "delete_event_log")?;
        state.event_logs.remove(&cell_id);
        Ok(())
    }
}
