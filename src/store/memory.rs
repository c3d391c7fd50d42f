//! In-memory store implementations.
//!
//! Interpret [`Filter`] the way a real backend would: AND all term matches,
//! apply the half-open date window, sort, then page. Used by the test
//! suites and by embedders that do not need durability.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use crate::history::HistoryEntry;
use crate::query::{fields, Filter, SortDirection};
use crate::register::Record;
use crate::statistics::Statistic;

use super::errors::{StoreError, StoreResult};
use super::{HistoryStore, RecordStore, StatisticsStore};

/// In-memory record store.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    records: RwLock<HashMap<String, Record>>,
}

impl InMemoryRecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RecordStore for InMemoryRecordStore {
    fn save(&self, record: &Record) -> StoreResult<()> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::backend("lock poisoned"))?;
        records.insert(record.id.clone(), record.clone());
        Ok(())
    }

    fn fetch(&self, id: &str) -> StoreResult<Option<Record>> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::backend("lock poisoned"))?;
        Ok(records.get(id).cloned())
    }

    fn query(&self, filter: &Filter) -> StoreResult<Vec<Record>> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::backend("lock poisoned"))?;
        let all: Vec<Record> = records.values().cloned().collect();
        Ok(apply_filter(all, filter, record_term, record_timestamp))
    }
}

fn record_term(record: &Record, field: &str) -> Option<String> {
    match field {
        "id" => Some(record.id.clone()),
        _ => None,
    }
}

fn record_timestamp(record: &Record, field: &str) -> Option<DateTime<Utc>> {
    match field {
        fields::LAST_MODIFIED => Some(record.last_modified),
        "created" => Some(record.created),
        _ => None,
    }
}

/// In-memory history store.
#[derive(Debug, Default)]
pub struct InMemoryHistoryStore {
    entries: RwLock<Vec<HistoryEntry>>,
}

impl InMemoryHistoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of entries across all records.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl HistoryStore for InMemoryHistoryStore {
    fn append(&self, entry: HistoryEntry) -> StoreResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StoreError::backend("lock poisoned"))?;
        entries.push(entry);
        Ok(())
    }

    fn list_about(
        &self,
        about: &str,
        from: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
    ) -> StoreResult<Vec<HistoryEntry>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::backend("lock poisoned"))?;

        let mut matched: Vec<HistoryEntry> = entries
            .iter()
            .filter(|e| e.about == about)
            .filter(|e| from.map_or(true, |f| e.last_modified >= f))
            .filter(|e| until.map_or(true, |u| e.last_modified < u))
            .cloned()
            .collect();

        matched.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
        Ok(matched)
    }
}

/// In-memory statistics store.
#[derive(Debug, Default)]
pub struct InMemoryStatisticsStore {
    statistics: RwLock<HashMap<String, Statistic>>,
}

impl InMemoryStatisticsStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored statistics.
    pub fn len(&self) -> usize {
        self.statistics.read().map(|s| s.len()).unwrap_or(0)
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StatisticsStore for InMemoryStatisticsStore {
    fn save(&self, statistic: &Statistic) -> StoreResult<()> {
        let mut statistics = self
            .statistics
            .write()
            .map_err(|_| StoreError::backend("lock poisoned"))?;
        statistics.insert(statistic.id.clone(), statistic.clone());
        Ok(())
    }

    fn fetch(&self, id: &str) -> StoreResult<Option<Statistic>> {
        let statistics = self
            .statistics
            .read()
            .map_err(|_| StoreError::backend("lock poisoned"))?;
        Ok(statistics.get(id).cloned())
    }

    fn query(&self, filter: &Filter) -> StoreResult<Vec<Statistic>> {
        let statistics = self
            .statistics
            .read()
            .map_err(|_| StoreError::backend("lock poisoned"))?;
        let all: Vec<Statistic> = statistics.values().cloned().collect();
        Ok(apply_filter(all, filter, statistic_term, statistic_timestamp))
    }

    fn delete(&self, id: &str) -> StoreResult<()> {
        let mut statistics = self
            .statistics
            .write()
            .map_err(|_| StoreError::backend("lock poisoned"))?;
        statistics.remove(id);
        Ok(())
    }
}

fn statistic_term(statistic: &Statistic, field: &str) -> Option<String> {
    match field {
        fields::ABOUT => Some(statistic.about.clone()),
        fields::SOURCE => Some(statistic.source.clone()),
        fields::TYPE => Some(statistic.stat_type.clone()),
        "id" => Some(statistic.id.clone()),
        _ => None,
    }
}

fn statistic_timestamp(statistic: &Statistic, field: &str) -> Option<DateTime<Utc>> {
    match field {
        fields::DATE => Some(statistic.date),
        _ => None,
    }
}

/// Applies a filter to a materialized set: terms and window narrow, sort
/// orders, offset/limit page. A criterion naming a field the document type
/// does not expose matches nothing.
fn apply_filter<T, FTerm, FDate>(
    mut items: Vec<T>,
    filter: &Filter,
    term_value: FTerm,
    date_value: FDate,
) -> Vec<T>
where
    FTerm: Fn(&T, &str) -> Option<String>,
    FDate: Fn(&T, &str) -> Option<DateTime<Utc>>,
{
    items.retain(|item| {
        filter
            .terms
            .iter()
            .all(|term| term_value(item, &term.field).as_deref() == Some(term.value.as_str()))
    });

    if let Some(window) = &filter.window {
        items.retain(|item| {
            date_value(item, &window.field).map_or(false, |ts| window.contains(ts))
        });
    }

    if let Some(sort) = &filter.sort {
        items.sort_by_key(|item| date_value(item, &sort.field).unwrap_or(DateTime::<Utc>::MIN_UTC));
        if sort.direction == SortDirection::Descending {
            items.reverse();
        }
    }

    if let Some(offset) = filter.offset {
        items = items.into_iter().skip(offset).collect();
    }
    if let Some(limit) = filter.limit {
        items.truncate(limit);
    }

    items
}
