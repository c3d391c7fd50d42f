//! History entries: immutable captures of prior record states.
//!
//! One entry is appended per mutating operation (merge, replace,
//! soft-delete), never on create. An entry holds a copy of the record's
//! state plus its own `about` / `triggered_by` fields; it shares no
//! behavior with the live record and has no mutators.
//!
//! Entries are never validated: history must be able to hold states that
//! were valid at write-time under a since-changed descriptor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::register::Record;

/// A record state captured immediately before a mutation.
///
/// Identical in shape to the persisted record minus the live `id`: the
/// record it belonged to is referenced through `about` instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Id of the record this state belonged to.
    pub about: String,

    /// Identity that triggered the mutation, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triggered_by: Option<String>,

    /// The captured state's creation timestamp.
    pub created: DateTime<Utc>,

    /// The captured state's own modification timestamp.
    pub last_modified: DateTime<Utc>,

    /// The captured body, exactly as it stood.
    pub body: Map<String, Value>,

    /// The captured admin partitions, exactly as they stood.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub admin: Map<String, Value>,
}

impl HistoryEntry {
    /// Captures the full current state of a record.
    pub fn capture(record: &Record, triggered_by: Option<&str>) -> Self {
        Self {
            about: record.id.clone(),
            triggered_by: triggered_by.map(str::to_string),
            created: record.created,
            last_modified: record.last_modified,
            body: record.body.clone(),
            admin: record.admin.clone(),
        }
    }
}
