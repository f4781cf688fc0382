use thiserror::Error;

/// Store layer errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{kind} already exists: {key}")]
    AlreadyExists { kind: &'static str, key: String },

    #[error("{kind} not found: {key}")]
    NotFound { kind: &'static str, key: String },

    /// Transient backend failure. Callers on the cleanup path retry these;
    /// everything else surfaces them.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    CoreError(#[from] apiary_core::error::CoreError),
}

impl StoreError {
    /// True when the operation may succeed if retried later.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
