//! Versioned repository-description records.
//!
//! # Design principles
//!
//! - Validation and tombstone gates run before any snapshot or state change
//! - Every mutation captures the full prior state for the history ledger
//! - Admin partitions are isolated by identity; foreign keys in a write are
//!   dropped silently, never merged, never rejected
//! - `created` is immutable; `last_modified` is system-assigned per write

mod descriptor;
mod errors;
mod record;

pub use descriptor::register_descriptor;
pub use errors::{RegisterError, RegisterResult};
pub use record::{Record, DELETED_KEY};
