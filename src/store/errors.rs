//! Store error types.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// A failure inside a store backend.
///
/// Absence of a document is not an error at this layer: fetches return
/// `Option` and the facade decides what absence means. `Backend` covers the
/// backend's own failures (connectivity, corruption, poisoned locks).
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The backend failed to execute the operation.
    #[error("store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Create a backend error.
    pub fn backend(reason: impl Into<String>) -> Self {
        StoreError::Backend(reason.into())
    }
}
