//! Read-only enumeration of a cell's dependent resources.

use apiary_core::types::{DependentKind, ResourceKind};
use apiary_store::store::UnitStore;
use uuid::Uuid;

use crate::error::EngineResult;

/// Snapshot of everything that hangs off a cell.
///
/// Box content counts extra boxes as well as WebDAV entries: a box beyond
/// the main box blocks synchronous deletion even when it is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceGraph {
    counts: Vec<(ResourceKind, u64)>,
}

impl ResourceGraph {
    /// Count for one resource kind.
    #[must_use]
    pub fn count(&self, kind: ResourceKind) -> u64 {
        self.counts
            .iter()
            .find(|(k, _)| *k == kind)
            .map_or(0, |(_, n)| *n)
    }

    /// Kinds with at least one instance, in fixed enumeration order.
    #[must_use]
    pub fn blocking_kinds(&self) -> Vec<ResourceKind> {
        self.counts
            .iter()
            .filter(|(_, n)| *n > 0)
            .map(|(k, _)| *k)
            .collect()
    }

    /// True when nothing beyond the empty main box exists.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.counts.iter().all(|(_, n)| *n == 0)
    }
}

/// ## Summary
/// Enumerates the dependent resources of a cell: extra boxes, WebDAV
/// entries, and every dependent record kind.
///
/// Read-only; counts reflect the state of the store at call time.
///
/// ## Errors
/// Returns store errors unchanged.
pub async fn inspect<S: UnitStore>(store: &S, cell_id: Uuid) -> EngineResult<ResourceGraph> {
    let extra_boxes = store
        .boxes_for_cell(cell_id)
        .await?
        .iter()
        .filter(|b| !b.main_box)
        .count() as u64;
    let dav_entries = store.count_entries(cell_id).await?;

    let mut counts = vec![(ResourceKind::BoxContent, extra_boxes + dav_entries)];
    for kind in DependentKind::ALL {
        let n = store.count_dependents(cell_id, kind).await?;
        counts.push((ResourceKind::Dependent(kind), n));
    }

    Ok(ResourceGraph { counts })
}

#[cfg(test)]
mod tests {
    use apiary_store::model::cell::NewCell;
    use apiary_store::model::dependent::NewDependent;
    use apiary_store::store::memory::MemoryStore;
    use apiary_store::store::{CellStore, DependentStore};

    use super::*;

    #[tokio::test]
    async fn fresh_cell_is_clean() {
        let store = MemoryStore::new();
        let cell = store
            .create_cell(NewCell {
                name: "cell1",
                owner: None,
            })
            .await
            .unwrap();

        let graph = inspect(&store, cell.id).await.unwrap();
        assert!(graph.is_clean());
        assert!(graph.blocking_kinds().is_empty());
    }

    #[tokio::test]
    async fn dependents_show_up_in_order() {
        let store = MemoryStore::new();
        let cell = store
            .create_cell(NewCell {
                name: "cell1",
                owner: None,
            })
            .await
            .unwrap();
        for (kind, name) in [
            (DependentKind::Role, "role1"),
            (DependentKind::Account, "hogehuga"),
        ] {
            store
                .create_dependent(NewDependent {
                    cell_id: cell.id,
                    kind,
                    name,
                })
                .await
                .unwrap();
        }

        let graph = inspect(&store, cell.id).await.unwrap();
        assert!(!graph.is_clean());
        assert_eq!(
            graph.blocking_kinds(),
            vec![
                ResourceKind::Dependent(DependentKind::Account),
                ResourceKind::Dependent(DependentKind::Role),
            ]
        );
        assert_eq!(graph.count(ResourceKind::Dependent(DependentKind::Role)), 1);
    }
}
