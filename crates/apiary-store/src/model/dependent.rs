use apiary_core::types::DependentKind;

/// A control record owned by a cell (Account, Role, Relation, ExtCell,
/// ExtRole, SentMessage, ReceivedMessage).
///
/// Existence of any instance blocks synchronous deletion of its cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependentRecord {
    pub id: uuid::Uuid,
    pub cell_id: uuid::Uuid,
    pub kind: DependentKind,
    pub name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Insert struct for creating new dependent records
#[derive(Debug, Clone)]
pub struct NewDependent<'a> {
    pub cell_id: uuid::Uuid,
    pub kind: DependentKind,
    pub name: &'a str,
}
