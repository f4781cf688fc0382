/// Entry kind in a box's WebDAV tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DavEntryKind {
    Collection,
    File,
}

impl DavEntryKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Collection => "collection",
            Self::File => "file",
        }
    }
}

impl std::fmt::Display for DavEntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file or collection stored under a box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DavEntry {
    pub id: uuid::Uuid,
    pub cell_id: uuid::Uuid,
    pub box_id: uuid::Uuid,
    pub path: String,
    pub kind: DavEntryKind,
    pub content: Vec<u8>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Insert struct for creating new WebDAV entries
#[derive(Debug, Clone)]
pub struct NewDavEntry<'a> {
    pub cell_id: uuid::Uuid,
    pub box_id: uuid::Uuid,
    pub path: &'a str,
    pub kind: DavEntryKind,
    pub content: &'a [u8],
}
