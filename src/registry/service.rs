//! The registry facade.
//!
//! Ties the engine together for an embedding API layer: capability checks,
//! the validate → snapshot → mutate → persist sequence, and the query
//! surface. The facade is synchronous and holds no per-request state; the
//! embedder is responsible for serializing mutations on the same record id.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::account::Account;
use crate::config::RegistryConfig;
use crate::history::HistoryEntry;
use crate::query;
use crate::register::Record;
use crate::schema::Descriptor;
use crate::statistics::Statistic;
use crate::store::{
    HistoryStore, InMemoryHistoryStore, InMemoryRecordStore, InMemoryStatisticsStore, RecordStore,
    StatisticsStore,
};

use super::errors::{RegistryError, RegistryResult};

/// The registry service.
///
/// The record descriptor is injected at construction so revised descriptor
/// versions can run side by side during a migration.
pub struct Registry<R, H, S> {
    descriptor: Descriptor,
    config: RegistryConfig,
    records: R,
    history: H,
    statistics: S,
}

impl Registry<InMemoryRecordStore, InMemoryHistoryStore, InMemoryStatisticsStore> {
    /// A registry backed entirely by in-memory stores.
    pub fn in_memory(descriptor: Descriptor, config: RegistryConfig) -> Self {
        Self::new(
            descriptor,
            config,
            InMemoryRecordStore::new(),
            InMemoryHistoryStore::new(),
            InMemoryStatisticsStore::new(),
        )
    }
}

impl<R, H, S> Registry<R, H, S>
where
    R: RecordStore,
    H: HistoryStore,
    S: StatisticsStore,
{
    /// Assemble a registry over the given stores.
    pub fn new(descriptor: Descriptor, config: RegistryConfig, records: R, history: H, statistics: S) -> Self {
        Self {
            descriptor,
            config,
            records,
            history,
            statistics,
        }
    }

    /// The record descriptor in force.
    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    /// Creates a record from a raw caller document and returns its id.
    ///
    /// No history entry is written for a create.
    pub fn create_record(&self, account: &Account, raw: Value) -> RegistryResult<String> {
        self.require_registry_access(account, "create registry records")?;

        let record = Record::create(&self.descriptor, raw, account.identity(), Utc::now())?;
        self.records.save(&record)?;

        info!(record = %record.id, account = %account.id, "record created");
        Ok(record.id)
    }

    /// Fetches a record by id.
    pub fn get_record(&self, id: &str) -> RegistryResult<Record> {
        self.records
            .fetch(id)?
            .ok_or_else(|| RegistryError::not_found(id))
    }

    /// Merges a raw caller document into a record.
    pub fn merge_record(
        &self,
        account: &Account,
        id: &str,
        incoming: Value,
    ) -> RegistryResult<Record> {
        self.require_registry_access(account, "modify registry records")?;

        let mut record = self.get_record(id)?;
        let entry = record.merge(&self.descriptor, incoming, account.identity(), Utc::now())?;
        self.persist_mutation(&record, entry)?;

        info!(record = %record.id, account = %account.id, "record merged");
        Ok(record)
    }

    /// Replaces a record's body with a raw caller document.
    pub fn replace_record(
        &self,
        account: &Account,
        id: &str,
        incoming: Value,
    ) -> RegistryResult<Record> {
        self.require_registry_access(account, "overwrite registry records")?;

        let mut record = self.get_record(id)?;
        let entry = record.replace(&self.descriptor, incoming, account.identity(), Utc::now())?;
        self.persist_mutation(&record, entry)?;

        info!(record = %record.id, account = %account.id, "record replaced");
        Ok(record)
    }

    /// Soft-deletes a record, leaving only the tombstone marker (and the
    /// admin partitions) behind.
    pub fn delete_record(&self, account: &Account, id: &str) -> RegistryResult<()> {
        self.require_registry_access(account, "delete registry records")?;

        let mut record = self.get_record(id)?;
        let entry = record.soft_delete(account.identity(), Utc::now());
        self.persist_mutation(&record, entry)?;

        info!(record = %record.id, account = %account.id, "record soft-deleted");
        Ok(())
    }

    /// Prior states of a record captured in `[from, until)`, most recent
    /// first.
    pub fn record_history(
        &self,
        id: &str,
        from: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
    ) -> RegistryResult<Vec<HistoryEntry>> {
        debug!(record = %id, "history listed");
        Ok(self.history.list_about(id, from, until)?)
    }

    /// Records modified in `[from, until)`, oldest first, for incremental
    /// change-feed consumption.
    pub fn change_list(
        &self,
        from: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
        offset: Option<usize>,
        size: Option<usize>,
    ) -> RegistryResult<Vec<Record>> {
        let size = self.config.page_size(size);
        let filter = query::change_list(from, until, offset, Some(size));
        debug!(?from, ?until, size, "change list queried");
        Ok(self.records.query(&filter)?)
    }

    /// Records a statistic about an existing record and returns it.
    pub fn add_statistic(
        &self,
        account: &Account,
        about: &str,
        raw: &Value,
    ) -> RegistryResult<Statistic> {
        self.require_statistics_access(account, "contribute statistics")?;

        // Statistics hang off a record; a dangling `about` is a client error.
        self.get_record(about)?;

        let statistic = Statistic::from_raw(about, raw, account.identity(), Utc::now())?;
        self.statistics.save(&statistic)?;

        info!(statistic = %statistic.id, record = %about, account = %account.id, "statistic added");
        Ok(statistic)
    }

    /// Statistics about a record, optionally narrowed by date window,
    /// contributing source, and type, most recent first.
    pub fn list_statistics(
        &self,
        about: &str,
        from: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
        source: Option<&str>,
        stat_type: Option<&str>,
    ) -> RegistryResult<Vec<Statistic>> {
        let filter = query::statistics(about, from, until, source, stat_type);
        debug!(record = %about, "statistics listed");
        Ok(self.statistics.query(&filter)?)
    }

    /// Deletes a statistic. Only the contributing source may delete its own
    /// statistics; configured super users override.
    pub fn delete_statistic(&self, account: &Account, id: &str) -> RegistryResult<()> {
        let statistic = self
            .statistics
            .fetch(id)?
            .ok_or_else(|| RegistryError::not_found(id))?;

        if statistic.source != account.identity() && !account.is_super(&self.config) {
            warn!(statistic = %id, account = %account.id, "statistic delete denied");
            return Err(RegistryError::authorisation(
                account.id.as_str(),
                "delete statistics contributed by another source",
            ));
        }

        self.statistics.delete(id)?;
        info!(statistic = %id, account = %account.id, "statistic deleted");
        Ok(())
    }

    /// Appends the pre-mutation snapshot, then saves the mutated record.
    /// The snapshot must be durably recorded before the mutation lands.
    fn persist_mutation(&self, record: &Record, entry: HistoryEntry) -> RegistryResult<()> {
        self.history.append(entry)?;
        self.records.save(record)?;
        Ok(())
    }

    fn require_registry_access(&self, account: &Account, action: &str) -> RegistryResult<()> {
        if account.access.registry {
            return Ok(());
        }
        warn!(account = %account.id, action, "registry access denied");
        Err(RegistryError::authorisation(account.id.as_str(), action))
    }

    fn require_statistics_access(&self, account: &Account, action: &str) -> RegistryResult<()> {
        if account.access.statistics {
            return Ok(());
        }
        warn!(account = %account.id, action, "statistics access denied");
        Err(RegistryError::authorisation(account.id.as_str(), action))
    }
}
