//! Cell creation and lookup.

use apiary_core::util::cell_name::validate_cell_name;
use apiary_store::model::cell::{CellRecord, NewCell};
use apiary_store::store::UnitStore;

use crate::auth::subject::UnitSubject;
use crate::error::{EngineError, EngineResult};

use super::CellService;

impl<S: UnitStore> CellService<S> {
    /// ## Summary
    /// Creates a cell, provisioning its main box in the same step. When an
    /// administrative credential carries a unit-user override, the created
    /// cell is owned by that user; a plain unit-user credential always owns
    /// what it creates.
    ///
    /// ## Errors
    /// - `NotAuthenticated` for anonymous or invalid subjects
    /// - `ValidationError` when the name violates the naming rules
    /// - `AlreadyExists` when the exact name is taken, including by a cell
    ///   still awaiting background cleanup
    ///
    /// ## Side Effects
    /// Inserts the cell record and its main box.
    #[tracing::instrument(skip(self, subject), fields(subject = %subject))]
    pub async fn create_cell(
        &self,
        subject: &UnitSubject,
        name: &str,
        unit_user_override: Option<&str>,
    ) -> EngineResult<CellRecord> {
        if matches!(subject, UnitSubject::Anonymous | UnitSubject::Invalid) {
            return Err(EngineError::NotAuthenticated);
        }
        validate_cell_name(name)
            .map_err(|err| EngineError::ValidationError(err.to_string()))?;

        let effective = subject.clone().downgrade(unit_user_override);
        let cell = self
            .store
            .create_cell(NewCell {
                name,
                owner: effective.subject(),
            })
            .await?;
        tracing::info!(cell_id = %cell.id, cell_name = %cell.name, "Cell created");
        Ok(cell)
    }

    /// ## Summary
    /// Looks the cell up by its exact name. A cell marked for bulk deletion
    /// is indistinguishable from an absent one.
    ///
    /// ## Errors
    /// - `NotFound` when no visible cell carries the name
    pub async fn get_cell(&self, name: &str) -> EngineResult<CellRecord> {
        self.store
            .cell_by_name(name)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("Cell: {name}")))
    }
}
