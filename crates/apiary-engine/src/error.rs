use apiary_core::types::ResourceKind;
use apiary_store::error::StoreError;
use thiserror::Error;

/// Engine layer errors - each maps onto the status code callers consume
#[derive(Error, Debug)]
pub enum EngineError {
    /// Dependent resources block synchronous deletion.
    #[error("Conflict: cell has related resources: {}", format_kinds(.0))]
    Conflict(Vec<ResourceKind>),

    /// A resource of the same name already exists.
    #[error("Conflict: already exists: {0}")]
    AlreadyExists(String),

    /// A required request control is missing or carries an invalid value,
    /// or a conditional check failed. Carries the control name.
    #[error("Precondition failed: {0}")]
    PreconditionFailed(&'static str),

    /// The subject is authenticated but not allowed to act on this cell.
    #[error("Forbidden: cell does not belong to the access subject")]
    Forbidden,

    /// Missing or invalid credential.
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The cell is busy with in-flight operations that did not drain in time.
    #[error("Too many concurrent requests for the cell")]
    TooManyConcurrent,

    /// The cleanup queue is gone; the unit is shutting down.
    #[error("Cleanup queue closed")]
    QueueClosed,

    #[error(transparent)]
    StoreError(StoreError),
}

fn format_kinds(kinds: &[ResourceKind]) -> String {
    kinds
        .iter()
        .map(|k| k.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl EngineError {
    /// HTTP-equivalent status code consumed by callers.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Conflict(_) | Self::AlreadyExists(_) => 409,
            Self::PreconditionFailed(_) => 412,
            Self::Forbidden => 403,
            Self::NotAuthenticated => 401,
            Self::NotFound(_) => 404,
            Self::ValidationError(_) => 400,
            Self::TooManyConcurrent => 503,
            Self::QueueClosed | Self::StoreError(_) => 500,
        }
    }

    /// Stable machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Conflict(_) => "conflict-has-related",
            Self::AlreadyExists(_) => "already-exists",
            Self::PreconditionFailed(_) => "precondition-failed",
            Self::Forbidden => "not-yours",
            Self::NotAuthenticated => "authorization-required",
            Self::NotFound(_) => "not-found",
            Self::ValidationError(_) => "invalid-request",
            Self::TooManyConcurrent => "too-many-concurrent",
            Self::QueueClosed | Self::StoreError(_) => "server-error",
        }
    }

    /// JSON error body (content type `application/json`).
    #[must_use]
    pub fn error_body(&self) -> serde_json::Value {
        serde_json::json!({
            "code": self.code(),
            "message": self.to_string(),
        })
    }
}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::AlreadyExists { key, .. } => Self::AlreadyExists(key),
            StoreError::NotFound { kind, key } => Self::NotFound(format!("{kind}: {key}")),
            other => Self::StoreError(other),
        }
    }
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use apiary_core::types::DependentKind;

    use super::*;

    #[test]
    fn conflict_names_blocking_kinds() {
        let err = EngineError::Conflict(vec![
            ResourceKind::BoxContent,
            ResourceKind::Dependent(DependentKind::Account),
        ]);

        assert_eq!(err.status_code(), 409);
        let body = err.error_body();
        assert_eq!(body["code"], "conflict-has-related");
        let message = body["message"].as_str().unwrap();
        assert!(message.contains("Box"));
        assert!(message.contains("Account"));
    }

    #[test]
    fn store_conflict_maps_to_409() {
        let err = EngineError::from(StoreError::AlreadyExists {
            kind: "Cell",
            key: "cell1".to_string(),
        });
        assert_eq!(err.status_code(), 409);
    }

    #[test]
    fn transient_store_error_maps_to_500() {
        let err = EngineError::from(StoreError::Unavailable("timeout".to_string()));
        assert_eq!(err.status_code(), 500);
    }
}
