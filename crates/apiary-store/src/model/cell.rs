use apiary_core::types::CellStatus;

/// Top-level tenant container record.
///
/// Uniqueness is by the exact, case-preserved `name`. A record in
/// [`CellStatus::BulkDeletion`] still occupies its name, so re-creation is
/// blocked until the cleanup worker removes the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRecord {
    pub id: uuid::Uuid,
    pub name: String,
    /// Owning unit-user subject, if any.
    pub owner: Option<String>,
    pub status: CellStatus,
    pub etag: String,
    pub revision: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Insert struct for creating new cells
#[derive(Debug, Clone)]
pub struct NewCell<'a> {
    pub name: &'a str,
    pub owner: Option<&'a str>,
}
