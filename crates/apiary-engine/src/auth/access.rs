//! Authorization checks for cell lifecycle operations.

use crate::error::{EngineError, EngineResult};

use super::subject::UnitSubject;

/// ## Summary
/// Checks whether a subject may mutate or delete a cell.
///
/// Administrative subjects always pass. User-scoped subjects must match the
/// cell's owner exactly; a cell without an owner belongs to nobody but the
/// administrators.
///
/// ## Errors
/// - `NotAuthenticated` for anonymous or invalid subjects
/// - `Forbidden` when a user-scoped subject does not own the cell
pub fn check_cell_access(subject: &UnitSubject, owner: Option<&str>) -> EngineResult<()> {
    match subject {
        UnitSubject::UnitMaster | UnitSubject::UnitAdmin => Ok(()),
        UnitSubject::UnitUser(s) | UnitSubject::UnitLocal(s) => {
            if owner == Some(s.as_str()) {
                Ok(())
            } else {
                Err(EngineError::Forbidden)
            }
        }
        UnitSubject::Anonymous | UnitSubject::Invalid => Err(EngineError::NotAuthenticated),
    }
}
