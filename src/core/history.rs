//! Bounded per-secret version history.
//!
//! Every value-changing update snapshots the pre-update blob into an
//! append-only ledger capped at [`MAX_VERSIONS_PER_SECRET`] entries. Restores
//! snapshot the current value first, so a restore is itself reversible.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::debug;

use crate::core::access::{Caller, CapabilityLevel, CapabilityResolver};
use crate::core::constants::MAX_VERSIONS_PER_SECRET;
use crate::core::crypto::EncryptedBlob;
use crate::core::domain::{SecretVersion, VersionMeta};
use crate::core::store::SecretStore;
use crate::error::{Result, StoreError};

/// Version history service over a [`SecretStore`].
///
/// The save+prune sequence for a single secret is serialized behind a
/// per-secret lock; concurrent updates to the same secret could otherwise
/// prune the wrong entries or duplicate version numbers. Different secrets
/// share nothing and proceed in parallel.
pub struct VersionLedger<'a> {
    store: &'a dyn SecretStore,
    // Grows with the set of secrets touched through this ledger and is never
    // evicted; entries are a few words each and a ledger lives per command.
    locks: Mutex<HashMap<(String, String), Arc<Mutex<()>>>>,
}

impl<'a> VersionLedger<'a> {
    pub fn new(store: &'a dyn SecretStore) -> Self {
        Self {
            store,
            locks: Mutex::new(HashMap::new()),
        }
    }

    fn secret_lock(&self, vault_id: &str, secret_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().expect("ledger lock poisoned");
        locks
            .entry((vault_id.to_string(), secret_id.to_string()))
            .or_default()
            .clone()
    }

    /// Snapshot a secret's pre-update blob into history.
    ///
    /// Inserts at `max(version_number) + 1` (1 for the first entry), then
    /// prunes the oldest entries beyond the retention cap. Returns the new
    /// entry's metadata.
    pub fn save_version(
        &self,
        secret_id: &str,
        vault_id: &str,
        blob: EncryptedBlob,
        actor: &str,
    ) -> Result<VersionMeta> {
        let lock = self.secret_lock(vault_id, secret_id);
        let _guard = lock.lock().expect("secret lock poisoned");
        self.save_version_locked(secret_id, vault_id, blob, actor)
    }

    /// Save a version while already holding the secret's lock.
    fn save_version_locked(
        &self,
        secret_id: &str,
        vault_id: &str,
        blob: EncryptedBlob,
        actor: &str,
    ) -> Result<VersionMeta> {
        let existing = self.store.versions(vault_id, &secret_id.to_string())?;
        let next_number = existing
            .iter()
            .map(|v| v.version_number)
            .max()
            .map_or(1, |n| n + 1);

        let version = SecretVersion {
            id: format!("sv-{}-{}", secret_id, next_number),
            secret_id: secret_id.to_string(),
            vault_id: vault_id.to_string(),
            version_number: next_number,
            blob,
            created_by: actor.to_string(),
            created_at: Utc::now(),
        };
        let meta = version.meta();
        self.store.put_version(version)?;

        // Prune oldest entries beyond the cap, by version number ascending.
        let mut all = self.store.versions(vault_id, &secret_id.to_string())?;
        if all.len() > MAX_VERSIONS_PER_SECRET {
            all.sort_by_key(|v| v.version_number);
            let excess = all.len() - MAX_VERSIONS_PER_SECRET;
            let pruned: Vec<String> = all.iter().take(excess).map(|v| v.id.clone()).collect();
            debug!(secret_id, count = pruned.len(), "pruning oldest versions");
            self.store.delete_versions(vault_id, secret_id, &pruned)?;
        }

        Ok(meta)
    }

    /// History metadata for a secret, newest first. Never returns ciphertext
    /// or decrypted values.
    pub fn list_versions(&self, secret_id: &str, vault_id: &str) -> Result<Vec<VersionMeta>> {
        let mut versions = self.store.versions(vault_id, &secret_id.to_string())?;
        versions.sort_by(|a, b| b.version_number.cmp(&a.version_number));
        Ok(versions.iter().map(SecretVersion::meta).collect())
    }

    /// Restore a secret to a historical version.
    ///
    /// The caller's capability is re-resolved here, before any store access;
    /// restoring rewrites the live value, so it is gated exactly like any
    /// other write.
    ///
    /// Snapshots the record's current blob as a new version first, then
    /// overwrites the record with the restored blob as-is: the blob keeps the
    /// key version it was originally sealed under, and a later rotation pass
    /// catches it up.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::PermissionDenied` when the caller is below
    /// `CapabilityLevel::Write`, and `StoreError::VersionNotFound` or
    /// `StoreError::SecretNotFound` if the (version, secret, vault) triple
    /// does not resolve.
    pub fn restore(
        &self,
        caller: &Caller,
        resolver: &CapabilityResolver,
        version_id: &str,
        secret_id: &str,
        vault_id: &str,
    ) -> Result<VersionMeta> {
        resolver.require(caller, CapabilityLevel::Write)?;

        let lock = self.secret_lock(vault_id, secret_id);
        let _guard = lock.lock().expect("secret lock poisoned");

        let version = self
            .store
            .version(vault_id, secret_id, version_id)?
            .ok_or_else(|| StoreError::VersionNotFound {
                version_id: version_id.to_string(),
                secret_id: secret_id.to_string(),
            })?;

        let mut record = self
            .store
            .secret(vault_id, secret_id)?
            .ok_or_else(|| StoreError::SecretNotFound(secret_id.to_string()))?;

        // The current value becomes a version, so the restore can be undone.
        let snapshot =
            self.save_version_locked(secret_id, vault_id, record.blob.clone(), &caller.username)?;

        record.blob = version.blob;
        record.updated_at = Utc::now();
        record.last_modified_by = caller.username.clone();
        self.store.put_secret(record)?;

        debug!(
            secret_id,
            restored = version_id,
            snapshot = %snapshot.id,
            "restored secret to historical version"
        );
        Ok(snapshot)
    }
}
