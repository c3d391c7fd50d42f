//! Admin Partition Tests
//!
//! The per-identity annotation map attached to each record:
//! - only the calling identity's own key is ever written
//! - foreign keys supplied in a write are dropped silently, not rejected
//! - an empty object removes the caller's key entirely
//! - partitions survive soft-delete

use repo_registry::account::Account;
use repo_registry::config::RegistryConfig;
use repo_registry::registry::Registry;
use repo_registry::schema::Descriptor;
use repo_registry::store::{InMemoryHistoryStore, InMemoryRecordStore, InMemoryStatisticsStore};
use serde_json::json;

// =============================================================================
// Helper Functions
// =============================================================================

type TestRegistry = Registry<InMemoryRecordStore, InMemoryHistoryStore, InMemoryStatisticsStore>;

fn registry() -> TestRegistry {
    let descriptor = Descriptor::new().with_fields(["name"]);
    Registry::in_memory(descriptor, RegistryConfig::default())
}

fn account(name: &str) -> Account {
    Account::new(format!("acc-{}", name), name).with_registry_access()
}

// =============================================================================
// Isolation Tests
// =============================================================================

/// A merge from identity "b" carrying both "a" and "b" admin keys writes
/// only "b"; "a" is untouched. The call succeeds - the foreign key is
/// dropped silently, not errored.
#[test]
fn test_foreign_admin_keys_dropped_silently() {
    let registry = registry();
    let a = account("a");
    let b = account("b");

    let id = registry
        .create_record(
            &a,
            json!({"body": {"name": "Repo"}, "admin": {"a": {"k": "v1"}}}),
        )
        .unwrap();

    let record = registry
        .merge_record(
            &b,
            &id,
            json!({"admin": {"a": {"k": "v2"}, "b": {"j": "w"}}}),
        )
        .unwrap();

    assert_eq!(record.admin_entry("a"), Some(&json!({"k": "v1"})));
    assert_eq!(record.admin_entry("b"), Some(&json!({"j": "w"})));
}

/// The same isolation applies on replace: the body is substituted wholesale
/// but foreign partitions survive.
#[test]
fn test_replace_preserves_foreign_partitions() {
    let registry = registry();
    let a = account("a");
    let b = account("b");

    let id = registry
        .create_record(
            &a,
            json!({"body": {"name": "Repo"}, "admin": {"a": {"note": "owned by a"}}}),
        )
        .unwrap();

    let record = registry
        .replace_record(
            &b,
            &id,
            json!({"body": {"name": "Renamed"}, "admin": {"a": {"note": "stolen"}}}),
        )
        .unwrap();

    assert_eq!(record.body.get("name"), Some(&json!("Renamed")));
    assert_eq!(record.admin_entry("a"), Some(&json!({"note": "owned by a"})));
    assert_eq!(record.admin_entry("b"), None);
}

/// Create prunes the supplied admin map to the creating identity's key.
#[test]
fn test_create_prunes_to_owner_key() {
    let registry = registry();
    let a = account("a");

    let id = registry
        .create_record(
            &a,
            json!({
                "body": {"name": "Repo"},
                "admin": {"a": {"mine": true}, "b": {"theirs": true}}
            }),
        )
        .unwrap();

    let record = registry.get_record(&id).unwrap();
    assert_eq!(record.admin_entry("a"), Some(&json!({"mine": true})));
    assert_eq!(record.admin_entry("b"), None);
}

/// The caller's own entry is replaced wholesale, not deep-merged.
#[test]
fn test_own_entry_replaced_wholesale() {
    let registry = registry();
    let a = account("a");

    let id = registry
        .create_record(
            &a,
            json!({"body": {"name": "Repo"}, "admin": {"a": {"k1": "v1", "k2": "v2"}}}),
        )
        .unwrap();

    let record = registry
        .merge_record(&a, &id, json!({"admin": {"a": {"k1": "new"}}}))
        .unwrap();

    assert_eq!(record.admin_entry("a"), Some(&json!({"k1": "new"})));
}

// =============================================================================
// Removal Tests
// =============================================================================

/// Merging an empty object as one's own entry removes the key entirely.
#[test]
fn test_empty_object_removes_own_entry() {
    let registry = registry();
    let a = account("a");

    let id = registry
        .create_record(
            &a,
            json!({"body": {"name": "Repo"}, "admin": {"a": {"k": "v"}}}),
        )
        .unwrap();

    let record = registry
        .merge_record(&a, &id, json!({"admin": {"a": {}}}))
        .unwrap();

    assert_eq!(record.admin_entry("a"), None);
    assert!(record.admin.is_empty());
}

/// An empty object supplied for a foreign key removes nothing.
#[test]
fn test_empty_object_cannot_remove_foreign_entry() {
    let registry = registry();
    let a = account("a");
    let b = account("b");

    let id = registry
        .create_record(
            &a,
            json!({"body": {"name": "Repo"}, "admin": {"a": {"k": "v"}}}),
        )
        .unwrap();

    let record = registry
        .merge_record(&b, &id, json!({"admin": {"a": {}}}))
        .unwrap();

    assert_eq!(record.admin_entry("a"), Some(&json!({"k": "v"})));
}

// =============================================================================
// Lifecycle Interaction Tests
// =============================================================================

/// Soft-delete reduces the body to the tombstone but retains every
/// partition untouched.
#[test]
fn test_partitions_survive_soft_delete() {
    let registry = registry();
    let a = account("a");
    let b = account("b");

    let id = registry
        .create_record(
            &a,
            json!({"body": {"name": "Repo"}, "admin": {"a": {"k": "v"}}}),
        )
        .unwrap();
    registry
        .merge_record(&b, &id, json!({"admin": {"b": {"j": "w"}}}))
        .unwrap();

    registry.delete_record(&a, &id).unwrap();

    let record = registry.get_record(&id).unwrap();
    assert!(record.is_deleted());
    assert_eq!(record.admin_entry("a"), Some(&json!({"k": "v"})));
    assert_eq!(record.admin_entry("b"), Some(&json!({"j": "w"})));
}

/// Admin-only merges still snapshot: the annotation history is auditable.
#[test]
fn test_admin_only_merge_snapshots() {
    let registry = registry();
    let a = account("a");

    let id = registry
        .create_record(&a, json!({"body": {"name": "Repo"}}))
        .unwrap();
    registry
        .merge_record(&a, &id, json!({"admin": {"a": {"round": 1}}}))
        .unwrap();
    registry
        .merge_record(&a, &id, json!({"admin": {"a": {"round": 2}}}))
        .unwrap();

    let history = registry.record_history(&id, None, None).unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].admin.get("a"), Some(&json!({"round": 1})));
    assert!(history[1].admin.is_empty());
}
