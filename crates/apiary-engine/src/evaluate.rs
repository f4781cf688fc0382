//! Deletion precondition evaluator.

use apiary_core::types::ResourceKind;
use apiary_store::store::UnitStore;
use uuid::Uuid;

use crate::error::EngineResult;
use crate::inspect::inspect;

/// Outcome of the deletion precondition check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanState {
    /// The cell has nothing beyond its empty main box; deletion may proceed.
    Clean,
    /// Deletion is blocked; every kind with remaining instances is listed.
    Blocked(Vec<ResourceKind>),
}

/// ## Summary
/// Applies the policy "a cell may only be deleted outright if it has no
/// dependent resources".
///
/// ## Errors
/// Returns store errors unchanged.
pub async fn evaluate<S: UnitStore>(store: &S, cell_id: Uuid) -> EngineResult<CleanState> {
    let graph = inspect(store, cell_id).await?;
    if graph.is_clean() {
        Ok(CleanState::Clean)
    } else {
        Ok(CleanState::Blocked(graph.blocking_kinds()))
    }
}

#[cfg(test)]
mod tests {
    use apiary_core::types::DependentKind;
    use apiary_store::model::boxes::NewBox;
    use apiary_store::model::cell::NewCell;
    use apiary_store::model::dependent::NewDependent;
    use apiary_store::store::memory::MemoryStore;
    use apiary_store::store::{BoxStore, CellStore, DependentStore};

    use super::*;

    async fn cell_with(store: &MemoryStore) -> uuid::Uuid {
        store
            .create_cell(NewCell {
                name: "cell1",
                owner: None,
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn empty_cell_evaluates_clean() {
        let store = MemoryStore::new();
        let cell_id = cell_with(&store).await;

        assert_eq!(evaluate(&store, cell_id).await.unwrap(), CleanState::Clean);
    }

    #[tokio::test]
    async fn extra_box_blocks_even_when_empty() {
        let store = MemoryStore::new();
        let cell_id = cell_with(&store).await;
        store
            .create_box(NewBox {
                cell_id,
                name: "testBox",
            })
            .await
            .unwrap();

        assert_eq!(
            evaluate(&store, cell_id).await.unwrap(),
            CleanState::Blocked(vec![ResourceKind::BoxContent])
        );
    }

    #[tokio::test]
    async fn dependent_blocks_until_removed() {
        let store = MemoryStore::new();
        let cell_id = cell_with(&store).await;
        let account = store
            .create_dependent(NewDependent {
                cell_id,
                kind: DependentKind::Account,
                name: "hogehuga",
            })
            .await
            .unwrap();

        assert_eq!(
            evaluate(&store, cell_id).await.unwrap(),
            CleanState::Blocked(vec![ResourceKind::Dependent(DependentKind::Account)])
        );

        store.remove_dependent(account.id).await.unwrap();
        assert_eq!(evaluate(&store, cell_id).await.unwrap(), CleanState::Clean);
    }
}
