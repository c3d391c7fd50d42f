//! Registry facade error taxonomy.
//!
//! Everything except a store backend failure is a client-facing error: the
//! caller sent a non-conforming document, collided with deletion state,
//! named a record that does not exist, or lacks the capability for the
//! operation. None of these is fatal to the process and none leaves a
//! partial mutation behind.

use thiserror::Error;

use crate::register::RegisterError;
use crate::statistics::StatisticError;
use crate::store::StoreError;

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// A failed registry operation.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A record operation was rejected (schema violation or tombstone
    /// conflict).
    #[error(transparent)]
    Register(#[from] RegisterError),

    /// A statistic payload was rejected.
    #[error(transparent)]
    Statistic(#[from] StatisticError),

    /// The operation targets a nonexistent record or statistic. Surfaced
    /// from the persistence collaborator unchanged.
    #[error("'{id}' not found")]
    NotFound {
        /// The id that resolved to nothing.
        id: String,
    },

    /// The account lacks the capability (or ownership) for the operation.
    #[error("account '{account}' may not {action}")]
    Authorisation {
        /// Account id.
        account: String,
        /// What was attempted.
        action: String,
    },

    /// The persistence collaborator failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RegistryError {
    /// Create a not-found error.
    pub fn not_found(id: impl Into<String>) -> Self {
        RegistryError::NotFound { id: id.into() }
    }

    /// Create an authorisation error.
    pub fn authorisation(account: impl Into<String>, action: impl Into<String>) -> Self {
        RegistryError::Authorisation {
            account: account.into(),
            action: action.into(),
        }
    }

    /// Whether the error is the caller's fault (as opposed to a backend
    /// failure). Embedding APIs map this to a 4xx/5xx split.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, RegistryError::Store(_))
    }
}
