//! Synchronous cell deletion.

use apiary_store::store::UnitStore;

use crate::auth::access::check_cell_access;
use crate::auth::subject::UnitSubject;
use crate::error::{EngineError, EngineResult};
use crate::evaluate::{CleanState, evaluate};
use crate::lock::AccessStatus;

use super::CellService;

impl<S: UnitStore> CellService<S> {
    /// ## Summary
    /// Deletes an empty cell in one call. The cell is claimed first so the
    /// emptiness check cannot race a concurrent provisioning; any dependent
    /// resource, including an empty extra box, turns the request away with a
    /// conflict naming every blocking kind.
    ///
    /// ## Errors
    /// - `NotFound` when no visible cell carries the name
    /// - `NotAuthenticated` / `Forbidden` per the cell access rules
    /// - `PreconditionFailed` when `if_match` is neither `"*"` nor the
    ///   cell's current ETag
    /// - `TooManyConcurrent` when in-flight operations do not drain in time
    /// - `Conflict` when dependent resources remain
    ///
    /// ## Side Effects
    /// Removes the event log, the main box, and the cell record.
    #[tracing::instrument(skip(self, subject), fields(subject = %subject))]
    pub async fn delete_cell(
        &self,
        subject: &UnitSubject,
        cell_name: &str,
        if_match: Option<&str>,
        unit_user_override: Option<&str>,
    ) -> EngineResult<()> {
        let effective = subject.clone().downgrade(unit_user_override);
        let cell = self.get_cell(cell_name).await?;
        check_cell_access(&effective, cell.owner.as_deref())?;

        if let Some(expected) = if_match
            && expected != "*"
            && expected != cell.etag
        {
            return Err(EngineError::PreconditionFailed("If-Match"));
        }

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

        match evaluate(&self.store, cell.id).await? {
            CleanState::Blocked(kinds) => Err(EngineError::Conflict(kinds)),
            CleanState::Clean => {
                if let Err(error) = self.store.delete_event_log(cell.id).await {
                    // The log does not block deletion; an orphaned one is
                    // swept by operators.
                    tracing::warn!(cell_id = %cell.id, %error, "Event log deletion failed");
                }
                self.store.remove_boxes(cell.id).await?;
                self.store.remove_cell(cell.id).await?;
                guard.finish();
                tracing::info!(cell_id = %cell.id, cell_name, "Cell deleted");
                Ok(())
            }
        }
    }
}
