//! Error types for versioned record operations.
//!
//! Both variants are recoverable client-input errors, never fatal to the
//! process. They are raised strictly before any snapshot or state change,
//! so a failed operation leaves the record and history untouched.

use thiserror::Error;

use crate::schema::SchemaError;

/// Result type for record operations.
pub type RegisterResult<T> = Result<T, RegisterError>;

/// A rejected record operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegisterError {
    /// The body or patch does not conform to the record descriptor.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A write collided with deletion state: either the target record is
    /// already deleted, or the incoming body carries the deletion marker.
    #[error("tombstone conflict: {reason}")]
    TombstoneConflict {
        /// What collided.
        reason: String,
    },
}

impl RegisterError {
    /// The target record is already soft-deleted.
    pub fn deleted_record(id: impl Into<String>) -> Self {
        RegisterError::TombstoneConflict {
            reason: format!("record '{}' is deleted", id.into()),
        }
    }

    /// The incoming body carries the deletion marker; a delete cannot be
    /// merged or replaced in.
    pub fn tombstoned_payload() -> Self {
        RegisterError::TombstoneConflict {
            reason: "payload carries the 'deleted' marker".into(),
        }
    }
}
