//! The versioned repository-description record.
//!
//! A record is mutated through exactly four operations: `create`, `merge`,
//! `replace`, and `soft_delete`. The three mutators capture the full prior
//! state as a [`HistoryEntry`] before touching the record, and every gate
//! (tombstone checks, schema validation) runs before the capture, so a
//! rejected operation leaves both the record and history untouched.
//!
//! The record assumes at-most-one in-flight mutation per id; serializing
//! mutations on the same id is the caller's responsibility.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::history::HistoryEntry;
use crate::schema::{json_type_name, validate_object, Descriptor, SchemaError};

use super::errors::{RegisterError, RegisterResult};

/// Body key marking a soft-deleted record. A deleted record's body holds
/// this key, with the deletion timestamp, and nothing else.
pub const DELETED_KEY: &str = "deleted";

/// A registry record: schema-constrained `body` plus per-identity `admin`
/// partitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Opaque record identifier, assigned at create.
    pub id: String,

    /// Creation timestamp. System-assigned, immutable after first write.
    pub created: DateTime<Utc>,

    /// Modification timestamp. System-assigned on every write.
    pub last_modified: DateTime<Utc>,

    /// The schema-constrained payload.
    #[serde(default)]
    pub body: Map<String, Value>,

    /// Per-third-party private annotations, keyed by identity. Entries are
    /// free-form and never schema-validated.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub admin: Map<String, Value>,
}

impl Record {
    /// Creates a record from a raw caller document.
    ///
    /// Caller-supplied `id` / `created` / `last_modified` are discarded; an
    /// id is minted and both timestamps are set to `now`. The body must
    /// validate against `descriptor`. A supplied admin map is pruned to the
    /// creating identity's own entry; anything under another identity's key
    /// is dropped silently.
    pub fn create(
        descriptor: &Descriptor,
        raw: Value,
        owner: &str,
        now: DateTime<Utc>,
    ) -> RegisterResult<Self> {
        let (body, mut supplied_admin) = partition_raw(raw)?;
        if body.contains_key(DELETED_KEY) {
            return Err(RegisterError::tombstoned_payload());
        }
        validate_object(&body, descriptor, "")?;

        let mut admin = Map::new();
        if let Some(entry) = supplied_admin.remove(owner) {
            if !is_empty_object(&entry) {
                admin.insert(owner.to_string(), entry);
            }
        }

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            created: now,
            last_modified: now,
            body,
            admin,
        })
    }

    /// Merges a raw caller document into this record.
    ///
    /// The incoming body is validated in full first; a partially-invalid
    /// patch is rejected wholesale, never applied field-by-field. Each
    /// incoming top-level body key then replaces the stored value wholesale
    /// (nested lists and objects are not deep-merged). Admin entries are
    /// applied under the caller-ownership rule: only the caller's own key
    /// is written, and an empty object removes it.
    ///
    /// Returns the pre-mutation state for the history ledger.
    pub fn merge(
        &mut self,
        descriptor: &Descriptor,
        incoming: Value,
        caller: &str,
        now: DateTime<Utc>,
    ) -> RegisterResult<HistoryEntry> {
        let (body, admin) = partition_raw(incoming)?;
        self.check_writable(&body)?;
        validate_object(&body, descriptor, "")?;

        let entry = self.snapshot(Some(caller));

        for (key, value) in body {
            self.body.insert(key, value);
        }
        self.apply_admin(admin, caller);
        self.last_modified = now;

        Ok(entry)
    }

    /// Replaces this record's body with a raw caller document.
    ///
    /// Same gates and admin semantics as [`merge`], but the entire body is
    /// substituted: nothing of the previous body survives.
    ///
    /// Returns the pre-mutation state for the history ledger.
    ///
    /// [`merge`]: Record::merge
    pub fn replace(
        &mut self,
        descriptor: &Descriptor,
        incoming: Value,
        caller: &str,
        now: DateTime<Utc>,
    ) -> RegisterResult<HistoryEntry> {
        let (body, admin) = partition_raw(incoming)?;
        self.check_writable(&body)?;
        validate_object(&body, descriptor, "")?;

        let entry = self.snapshot(Some(caller));

        self.body = body;
        self.apply_admin(admin, caller);
        self.last_modified = now;

        Ok(entry)
    }

    /// Soft-deletes this record.
    ///
    /// The body is reduced to the single tombstone marker carrying the
    /// deletion timestamp; admin partitions survive. Repeated deletes keep
    /// refreshing the timestamp and keep snapshotting.
    ///
    /// Returns the pre-delete state for the history ledger.
    pub fn soft_delete(&mut self, caller: &str, now: DateTime<Utc>) -> HistoryEntry {
        let entry = self.snapshot(Some(caller));

        let mut tombstone = Map::new();
        tombstone.insert(
            DELETED_KEY.to_string(),
            Value::String(timestamp_string(now)),
        );
        self.body = tombstone;
        self.last_modified = now;

        entry
    }

    /// Captures the full current state. Used by the mutators above; never
    /// invoked for `create`.
    pub fn snapshot(&self, triggered_by: Option<&str>) -> HistoryEntry {
        HistoryEntry::capture(self, triggered_by)
    }

    /// Whether this record has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.body.contains_key(DELETED_KEY)
    }

    /// The deletion timestamp string, if this record is soft-deleted.
    pub fn deleted_at(&self) -> Option<&str> {
        self.body.get(DELETED_KEY).and_then(Value::as_str)
    }

    /// The admin entry owned by the given identity, if present.
    pub fn admin_entry(&self, identity: &str) -> Option<&Value> {
        self.admin.get(identity)
    }

    /// Rejects writes into a deleted record and payloads that carry the
    /// deletion marker.
    fn check_writable(&self, incoming_body: &Map<String, Value>) -> RegisterResult<()> {
        if self.is_deleted() {
            return Err(RegisterError::deleted_record(self.id.as_str()));
        }
        if incoming_body.contains_key(DELETED_KEY) {
            return Err(RegisterError::tombstoned_payload());
        }
        Ok(())
    }

    /// Applies supplied admin entries under the ownership rule: only the
    /// caller's own key is written, wholesale; an empty object removes the
    /// key entirely.
    ///
    /// Keys belonging to other identities are dropped silently rather than
    /// rejected: a write may legitimately carry a full copy of the record,
    /// and must not clobber (or be failed by) partitions it does not own.
    fn apply_admin(&mut self, supplied: Map<String, Value>, caller: &str) {
        for (key, value) in supplied {
            if key != caller {
                continue;
            }
            if is_empty_object(&value) {
                self.admin.remove(&key);
            } else {
                self.admin.insert(key, value);
            }
        }
    }
}

/// Splits a raw caller document into (body, admin), discarding the
/// system-assigned `id` / `created` / `last_modified` fields.
///
/// Two intake shapes are accepted: the persisted form `{body: {...},
/// admin?: {...}}`, and the bare form where the payload itself is the body.
fn partition_raw(raw: Value) -> RegisterResult<(Map<String, Value>, Map<String, Value>)> {
    let mut top = match raw {
        Value::Object(map) => map,
        other => {
            return Err(
                SchemaError::type_mismatch("$root", "object", json_type_name(&other)).into(),
            )
        }
    };

    top.remove("id");
    top.remove("created");
    top.remove("last_modified");

    let admin = match top.remove("admin") {
        None => Map::new(),
        Some(Value::Object(map)) => map,
        Some(other) => {
            return Err(
                SchemaError::type_mismatch("admin", "object", json_type_name(&other)).into(),
            )
        }
    };

    let body = match top.remove("body") {
        // Bare form: the remaining payload is the body.
        None => top,
        Some(Value::Object(map)) => {
            if let Some(extra) = top.keys().next() {
                return Err(SchemaError::undeclared_key(extra.as_str()).into());
            }
            map
        }
        Some(other) => {
            return Err(
                SchemaError::type_mismatch("body", "object", json_type_name(&other)).into(),
            )
        }
    };

    Ok((body, admin))
}

fn is_empty_object(value: &Value) -> bool {
    value.as_object().map_or(false, |m| m.is_empty())
}

/// Timestamp format used inside document bodies.
fn timestamp_string(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Descriptor;
    use serde_json::json;

    fn descriptor() -> Descriptor {
        Descriptor::new()
            .with_fields(["name", "url", "operational_status"])
            .with_lists(["tags"])
    }

    fn create(raw: Value, owner: &str) -> Record {
        Record::create(&descriptor(), raw, owner, Utc::now()).unwrap()
    }

    #[test]
    fn test_create_assigns_system_fields() {
        let now = Utc::now();
        let record = Record::create(&descriptor(), json!({"name": "Repo A"}), "a", now).unwrap();

        assert!(!record.id.is_empty());
        assert_eq!(record.created, now);
        assert_eq!(record.last_modified, now);
        assert_eq!(record.body, json!({"name": "Repo A"}).as_object().unwrap().clone());
    }

    #[test]
    fn test_create_discards_caller_system_fields() {
        let record = create(
            json!({
                "id": "forged",
                "created": "1999-01-01T00:00:00Z",
                "last_modified": "1999-01-01T00:00:00Z",
                "body": {"name": "Repo A"}
            }),
            "a",
        );

        assert_ne!(record.id, "forged");
        assert!(record.created.timestamp() > 946_684_800); // well past 1999
    }

    #[test]
    fn test_create_accepts_bare_body_form() {
        let wrapped = create(json!({"body": {"name": "Repo A"}}), "a");
        let bare = create(json!({"name": "Repo A"}), "a");
        assert_eq!(wrapped.body, bare.body);
    }

    #[test]
    fn test_create_rejects_invalid_body() {
        let result = Record::create(
            &descriptor(),
            json!({"body": {"junk": "x"}}),
            "a",
            Utc::now(),
        );
        assert!(matches!(result, Err(RegisterError::Schema(_))));
    }

    #[test]
    fn test_create_rejects_sibling_of_body() {
        let result = Record::create(
            &descriptor(),
            json!({"body": {"name": "Repo A"}, "extra": 1}),
            "a",
            Utc::now(),
        );
        assert!(matches!(result, Err(RegisterError::Schema(_))));
    }

    #[test]
    fn test_create_prunes_foreign_admin_keys() {
        let record = create(
            json!({
                "body": {"name": "Repo A"},
                "admin": {"a": {"note": "mine"}, "b": {"note": "not mine"}}
            }),
            "a",
        );

        assert_eq!(record.admin_entry("a"), Some(&json!({"note": "mine"})));
        assert_eq!(record.admin_entry("b"), None);
    }

    #[test]
    fn test_merge_replaces_top_level_keys_wholesale() {
        let mut record = create(json!({"name": "Repo A", "tags": ["x", "y"]}), "a");

        record
            .merge(
                &descriptor(),
                json!({"name": "Repo B", "tags": ["z"]}),
                "a",
                Utc::now(),
            )
            .unwrap();

        assert_eq!(record.body.get("name"), Some(&json!("Repo B")));
        // No list-append semantics: the incoming list wins wholesale.
        assert_eq!(record.body.get("tags"), Some(&json!(["z"])));
    }

    #[test]
    fn test_merge_keeps_untouched_keys() {
        let mut record = create(json!({"name": "Repo A", "url": "http://a"}), "a");

        record
            .merge(&descriptor(), json!({"name": "Repo B"}), "a", Utc::now())
            .unwrap();

        assert_eq!(record.body.get("url"), Some(&json!("http://a")));
    }

    #[test]
    fn test_merge_rejects_invalid_patch_wholesale() {
        let mut record = create(json!({"name": "Repo A"}), "a");
        let before = record.clone();

        let result = record.merge(
            &descriptor(),
            json!({"name": "Repo B", "junk": true}),
            "a",
            Utc::now(),
        );

        assert!(matches!(result, Err(RegisterError::Schema(_))));
        assert_eq!(record, before); // nothing applied
    }

    #[test]
    fn test_replace_leaves_no_residue() {
        let mut record = create(json!({"name": "Repo A", "url": "http://a"}), "a");

        record
            .replace(&descriptor(), json!({"name": "Repo C"}), "a", Utc::now())
            .unwrap();

        assert_eq!(record.body, json!({"name": "Repo C"}).as_object().unwrap().clone());
    }

    #[test]
    fn test_mutation_returns_prior_state() {
        let mut record = create(json!({"name": "Repo A"}), "a");

        let entry = record
            .merge(&descriptor(), json!({"name": "Repo B"}), "a", Utc::now())
            .unwrap();

        assert_eq!(entry.body.get("name"), Some(&json!("Repo A")));
        assert_eq!(entry.about, record.id);
        assert_eq!(entry.triggered_by.as_deref(), Some("a"));
    }

    #[test]
    fn test_created_is_immutable_across_mutations() {
        let mut record = create(json!({"name": "Repo A"}), "a");
        let created = record.created;

        record
            .merge(
                &descriptor(),
                json!({"name": "B", "created": "1999-01-01T00:00:00Z"}),
                "a",
                Utc::now(),
            )
            .unwrap();
        record
            .replace(&descriptor(), json!({"name": "C"}), "a", Utc::now())
            .unwrap();
        record.soft_delete("a", Utc::now());

        assert_eq!(record.created, created);
    }

    #[test]
    fn test_last_modified_never_decreases() {
        let mut record = create(json!({"name": "Repo A"}), "a");
        let mut previous = record.last_modified;

        for name in ["B", "C", "D"] {
            record
                .merge(&descriptor(), json!({ "name": name }), "a", Utc::now())
                .unwrap();
            assert!(record.last_modified >= previous);
            previous = record.last_modified;
        }
    }

    #[test]
    fn test_soft_delete_leaves_only_tombstone() {
        let mut record = create(
            json!({"body": {"name": "Repo A"}, "admin": {"a": {"note": "kept"}}}),
            "a",
        );

        record.soft_delete("a", Utc::now());

        assert!(record.is_deleted());
        assert_eq!(record.body.len(), 1);
        assert!(record.deleted_at().is_some());
        assert_eq!(record.admin_entry("a"), Some(&json!({"note": "kept"})));
    }

    #[test]
    fn test_soft_delete_is_idempotent_in_effect() {
        let mut record = create(json!({"name": "Repo A"}), "a");

        let first = Utc::now();
        record.soft_delete("a", first);
        let first_stamp = record.deleted_at().unwrap().to_string();

        let second = first + chrono::Duration::seconds(5);
        let entry = record.soft_delete("a", second);

        assert!(record.is_deleted());
        assert_ne!(record.deleted_at().unwrap(), first_stamp);
        // The repeat delete still snapshots the (tombstoned) prior state.
        assert!(entry.body.contains_key(DELETED_KEY));
    }

    #[test]
    fn test_merge_into_deleted_record_conflicts() {
        let mut record = create(json!({"name": "Repo A"}), "a");
        record.soft_delete("a", Utc::now());

        let result = record.merge(&descriptor(), json!({"name": "Repo B"}), "a", Utc::now());
        assert!(matches!(
            result,
            Err(RegisterError::TombstoneConflict { .. })
        ));
    }

    #[test]
    fn test_tombstoned_payload_conflicts() {
        let mut record = create(json!({"name": "Repo A"}), "a");
        let before = record.clone();

        for op in ["merge", "replace"] {
            let incoming = json!({"deleted": "2014-05-11T17:12:45Z"});
            let result = match op {
                "merge" => record.merge(&descriptor(), incoming, "a", Utc::now()),
                _ => record.replace(&descriptor(), incoming, "a", Utc::now()),
            };
            assert!(matches!(
                result,
                Err(RegisterError::TombstoneConflict { .. })
            ));
            assert_eq!(record, before);
        }
    }

    #[test]
    fn test_admin_scoped_to_caller() {
        let mut record = create(
            json!({"body": {"name": "Repo A"}, "admin": {"a": {"k": "v1"}}}),
            "a",
        );

        record
            .merge(
                &descriptor(),
                json!({"admin": {"a": {"k": "v2"}, "b": {"j": "w"}}}),
                "b",
                Utc::now(),
            )
            .unwrap();

        assert_eq!(record.admin_entry("a"), Some(&json!({"k": "v1"})));
        assert_eq!(record.admin_entry("b"), Some(&json!({"j": "w"})));
    }

    #[test]
    fn test_empty_admin_object_removes_entry() {
        let mut record = create(
            json!({"body": {"name": "Repo A"}, "admin": {"a": {"k": "v"}}}),
            "a",
        );

        record
            .merge(&descriptor(), json!({"admin": {"a": {}}}), "a", Utc::now())
            .unwrap();

        assert_eq!(record.admin_entry("a"), None);
        assert!(record.admin.is_empty());
    }

    #[test]
    fn test_record_json_round_trip() {
        let record = create(
            json!({"body": {"name": "Repo A"}, "admin": {"a": {"k": "v"}}}),
            "a",
        );

        let json = serde_json::to_string(&record).unwrap();
        let back: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(record, back);
    }
}
