/// Lifecycle status of a cell.
///
/// `BulkDeletion` is the deletion mark: once set the cell disappears from
/// lookups and rejects every further mutation, even though dependent records
/// may still physically exist while the cleanup worker runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellStatus {
    Normal,
    BulkDeletion,
}

/// Control record kinds owned by a cell.
///
/// A closed set: the precondition evaluator and the cleanup worker iterate
/// [`DependentKind::ALL`] instead of branching per type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependentKind {
    Account,
    Role,
    Relation,
    ExtCell,
    ExtRole,
    SentMessage,
    ReceivedMessage,
}

impl DependentKind {
    /// Every dependent kind, in cleanup order.
    pub const ALL: [Self; 7] = [
        Self::Account,
        Self::Role,
        Self::Relation,
        Self::ExtCell,
        Self::ExtRole,
        Self::SentMessage,
        Self::ReceivedMessage,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Account => "Account",
            Self::Role => "Role",
            Self::Relation => "Relation",
            Self::ExtCell => "ExtCell",
            Self::ExtRole => "ExtRole",
            Self::SentMessage => "SentMessage",
            Self::ReceivedMessage => "ReceivedMessage",
        }
    }
}

impl std::fmt::Display for DependentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resource classes that can block synchronous deletion of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// WebDAV content (files or collections) in any box of the cell.
    BoxContent,
    /// A control record of the given kind.
    Dependent(DependentKind),
}

impl ResourceKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BoxContent => "Box",
            Self::Dependent(kind) => kind.as_str(),
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
