//! Cross-component workflow tests.
//!
//! Full lifecycle scenarios that span the encryption engine, version ledger,
//! and rotation coordinator.

use std::collections::HashMap;

use chrono::Utc;

use envault::core::access::{Caller, CapabilityResolver, RoleMapper, VcsRoleProvider};
use envault::core::crypto::EncryptionEngine;
use envault::core::domain::SecretRecord;
use envault::core::history::VersionLedger;
use envault::core::keys::KeyRegistry;
use envault::core::rotation::{RotationCoordinator, RotationOptions};
use envault::core::store::{MemoryStore, SecretStore};
use envault::error::Result;

/// Static role table for tests.
struct RoleTable(HashMap<String, String>);

impl VcsRoleProvider for RoleTable {
    fn user_role(&self, _: &str, _: &str, _: &str, username: &str) -> Result<String> {
        Ok(self.0.get(username).cloned().unwrap_or_default())
    }
}

fn write_resolver() -> CapabilityResolver {
    let mut table = HashMap::new();
    table.insert("bob".to_string(), "push".to_string());
    CapabilityResolver::new(RoleMapper::GitHub, Box::new(RoleTable(table)))
}

fn caller(username: &str) -> Caller {
    Caller {
        token: "tok".to_string(),
        owner: "acme".to_string(),
        repo: "api".to_string(),
        username: username.to_string(),
    }
}

fn registry() -> KeyRegistry {
    KeyRegistry::from_config_str(&format!(
        "1:{},2:{}",
        hex::encode([0x11; 32]),
        hex::encode([0x22; 32])
    ))
    .unwrap()
}

fn put_secret(store: &MemoryStore, engine: &EncryptionEngine, value: &str, version: u32) {
    store
        .put_secret(SecretRecord {
            id: "s-1".to_string(),
            vault_id: "production".to_string(),
            key: "API_KEY".to_string(),
            blob: engine.seal(value, version).unwrap(),
            updated_at: Utc::now(),
            last_modified_by: "alice".to_string(),
        })
        .unwrap();
}

/// Snapshot the current value, then write the new one, as a push would.
fn update_secret(
    store: &MemoryStore,
    ledger: &VersionLedger,
    engine: &EncryptionEngine,
    value: &str,
) {
    let current = store.secret("production", "s-1").unwrap().unwrap();
    ledger
        .save_version("s-1", "production", current.blob, "alice")
        .unwrap();
    put_secret(store, engine, value, engine.current_version());
}

#[test]
fn test_eleven_updates_keep_versions_two_through_eleven() {
    let registry = registry();
    let engine = EncryptionEngine::new(&registry);
    let store = MemoryStore::new();
    let ledger = VersionLedger::new(&store);

    put_secret(&store, &engine, "value-0", 2);
    for i in 1..=11 {
        update_secret(&store, &ledger, &engine, &format!("value-{}", i));
    }

    let versions = ledger.list_versions("s-1", "production").unwrap();
    assert_eq!(versions.len(), 10);
    assert_eq!(versions[0].version_number, 11);
    assert_eq!(versions.last().unwrap().version_number, 2);
}

#[test]
fn test_restore_round_trips_decrypted_value() {
    let registry = registry();
    let engine = EncryptionEngine::new(&registry);
    let store = MemoryStore::new();
    let ledger = VersionLedger::new(&store);

    put_secret(&store, &engine, "original", 2);
    update_secret(&store, &ledger, &engine, "replacement");

    // Restore back to the original, then restore the restore.
    let resolver = write_resolver();
    let versions = ledger.list_versions("s-1", "production").unwrap();
    let snapshot = ledger
        .restore(&caller("bob"), &resolver, &versions[0].id, "s-1", "production")
        .unwrap();
    let restored = store.secret("production", "s-1").unwrap().unwrap();
    assert_eq!(engine.open(&restored.blob).unwrap(), "original");

    ledger
        .restore(&caller("bob"), &resolver, &snapshot.id, "s-1", "production")
        .unwrap();
    let back = store.secret("production", "s-1").unwrap().unwrap();
    assert_eq!(engine.open(&back.blob).unwrap(), "replacement");

    // Each restore added exactly one entry.
    assert_eq!(ledger.list_versions("s-1", "production").unwrap().len(), 3);
}

#[test]
fn test_rotation_catches_up_restored_secret() {
    let registry = registry();
    let engine = EncryptionEngine::new(&registry);
    let store = MemoryStore::new();
    let ledger = VersionLedger::new(&store);

    // History entry sealed under the old key, live record under the new one.
    ledger
        .save_version("s-1", "production", engine.seal("old-value", 1).unwrap(), "alice")
        .unwrap();
    put_secret(&store, &engine, "new-value", 2);

    let versions = ledger.list_versions("s-1", "production").unwrap();
    ledger
        .restore(
            &caller("bob"),
            &write_resolver(),
            &versions[0].id,
            "s-1",
            "production",
        )
        .unwrap();

    // Restore never re-encrypts: the record is back on key version 1.
    let restored = store.secret("production", "s-1").unwrap().unwrap();
    assert_eq!(restored.blob.key_version, 1);

    // A rotation pass brings it to the current version, same plaintext.
    let coordinator = RotationCoordinator::new(&store, &engine, RotationOptions::default());
    let report = coordinator.run().unwrap();
    assert!(report.ok());

    let rotated = store.secret("production", "s-1").unwrap().unwrap();
    assert_eq!(rotated.blob.key_version, 2);
    assert_eq!(engine.open(&rotated.blob).unwrap(), "old-value");
}
