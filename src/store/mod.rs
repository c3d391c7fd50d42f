//! Persistence contract and in-memory implementations.
//!
//! The engine treats persistence as an external collaborator: a durable,
//! immediately-consistent document store with query-by-filter and
//! sort-by-field capability. These traits are the contract that
//! collaborator must satisfy; the in-memory implementations honor it for
//! tests and embedded use.
//!
//! The stores provide no concurrency control beyond last-write-wins on
//! save. Serializing mutations per record id is the embedding service's
//! responsibility (per-id mutex or an optimistic check in a real backend).

mod errors;
mod memory;

pub use errors::{StoreError, StoreResult};
pub use memory::{InMemoryHistoryStore, InMemoryRecordStore, InMemoryStatisticsStore};

use chrono::{DateTime, Utc};

use crate::history::HistoryEntry;
use crate::query::Filter;
use crate::register::Record;
use crate::statistics::Statistic;

/// Storage for live registry records.
pub trait RecordStore: Send + Sync {
    /// Persist a record, overwriting any previous state under its id.
    fn save(&self, record: &Record) -> StoreResult<()>;

    /// Fetch a record by id.
    fn fetch(&self, id: &str) -> StoreResult<Option<Record>>;

    /// Return records matching a filter, in the filter's order.
    fn query(&self, filter: &Filter) -> StoreResult<Vec<Record>>;
}

/// Append-only storage for history entries.
///
/// Entries are immutable once appended; there is no update or delete.
pub trait HistoryStore: Send + Sync {
    /// Append an entry.
    fn append(&self, entry: HistoryEntry) -> StoreResult<()>;

    /// Entries about one record whose captured `last_modified` falls in
    /// `[from, until)`, most recent first.
    fn list_about(
        &self,
        about: &str,
        from: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
    ) -> StoreResult<Vec<HistoryEntry>>;
}

/// Storage for statistics.
pub trait StatisticsStore: Send + Sync {
    /// Persist a statistic.
    fn save(&self, statistic: &Statistic) -> StoreResult<()>;

    /// Fetch a statistic by id.
    fn fetch(&self, id: &str) -> StoreResult<Option<Statistic>>;

    /// Return statistics matching a filter, in the filter's order.
    fn query(&self, filter: &Filter) -> StoreResult<Vec<Statistic>>;

    /// Remove a statistic by id. Removing an absent id is a no-op.
    fn delete(&self, id: &str) -> StoreResult<()>;
}
