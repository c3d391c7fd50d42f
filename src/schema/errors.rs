//! Schema validation error types.
//!
//! Validation produces exactly one error kind, `SchemaError`, for any
//! well-formed but non-conforming document. Every variant carries the key
//! path of the offending value (e.g. `metadata[0].record.name`) so callers
//! can build a precise client error.

use thiserror::Error;

/// Result type for schema validation.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// A structural validation failure.
///
/// Validation is fail-fast: the first violation encountered is reported and
/// the walk stops.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A key present in the document is declared in none of the four
    /// descriptor categories at its level.
    #[error("undeclared key '{path}'")]
    UndeclaredKey {
        /// Key chain from the document root to the offending key.
        path: String,
    },

    /// A declared key holds a value of the wrong shape.
    #[error("key '{path}': expected {expected}, found {found}")]
    TypeMismatch {
        /// Key chain from the document root to the offending value.
        path: String,
        /// Shape the descriptor requires.
        expected: &'static str,
        /// Shape actually found in the document.
        found: &'static str,
    },

    /// A key is declared as a nested object but the descriptor supplies no
    /// sub-descriptor for it, so its contents cannot be checked.
    #[error("key '{path}': declared as a nested object but no sub-descriptor is provided")]
    MissingEntry {
        /// Key chain from the document root to the undescribed object.
        path: String,
    },
}

impl SchemaError {
    /// Create an undeclared-key error.
    pub fn undeclared_key(path: impl Into<String>) -> Self {
        SchemaError::UndeclaredKey { path: path.into() }
    }

    /// Create a type-mismatch error.
    pub fn type_mismatch(
        path: impl Into<String>,
        expected: &'static str,
        found: &'static str,
    ) -> Self {
        SchemaError::TypeMismatch {
            path: path.into(),
            expected,
            found,
        }
    }

    /// Create a missing-sub-descriptor error.
    pub fn missing_entry(path: impl Into<String>) -> Self {
        SchemaError::MissingEntry { path: path.into() }
    }

    /// The key path the error is about.
    pub fn path(&self) -> &str {
        match self {
            SchemaError::UndeclaredKey { path }
            | SchemaError::TypeMismatch { path, .. }
            | SchemaError::MissingEntry { path } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_carries_path() {
        let err = SchemaError::type_mismatch("metadata[0].record.name", "scalar", "array");
        assert_eq!(err.path(), "metadata[0].record.name");

        let display = format!("{}", err);
        assert!(display.contains("metadata[0].record.name"));
        assert!(display.contains("scalar"));
        assert!(display.contains("array"));
    }

    #[test]
    fn test_undeclared_key_display() {
        let err = SchemaError::undeclared_key("not_allowed");
        assert_eq!(format!("{}", err), "undeclared key 'not_allowed'");
    }
}
