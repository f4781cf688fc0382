/// Box record: a sub-container of a cell holding a WebDAV file tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxRecord {
    pub id: uuid::Uuid,
    pub cell_id: uuid::Uuid,
    pub name: String,
    /// The main box is provisioned together with its cell and only removed
    /// when the cell goes away.
    pub main_box: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Insert struct for creating new boxes
#[derive(Debug, Clone)]
pub struct NewBox<'a> {
    pub cell_id: uuid::Uuid,
    pub name: &'a str,
}
