//! Persisted secret state.
//!
//! Abstracts storage behind two traits so the core never binds to a database
//! engine: [`SecretStore`] for secret/version CRUD and [`RotationStore`] for
//! the batch re-encryption scans. [`MemoryStore`] implements both and can be
//! snapshotted to/from a JSON file for the CLI.
//!
//! ## Adding a New Storage Backend
//!
//! 1. Implement `SecretStore` (and `RotationStore` if rotation should cover it)
//! 2. Add the implementation in a new file (e.g., `postgres.rs`)
//! 3. Re-export from this module

use crate::core::crypto::EncryptedBlob;
use crate::core::domain::{SecretRecord, SecretVersion};
use crate::core::types::{SecretId, VaultId};
use crate::error::Result;

mod memory;

pub use memory::MemoryStore;

/// The three record families whose blobs rotate with the key registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordCategory {
    Secrets,
    ConnectionTokens,
    UserTokens,
}

impl RecordCategory {
    pub const ALL: [RecordCategory; 3] = [
        RecordCategory::Secrets,
        RecordCategory::ConnectionTokens,
        RecordCategory::UserTokens,
    ];
}

impl std::fmt::Display for RecordCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RecordCategory::Secrets => "secrets",
            RecordCategory::ConnectionTokens => "connection-tokens",
            RecordCategory::UserTokens => "user-tokens",
        };
        write!(f, "{}", name)
    }
}

/// Which encrypted field of a record a rotation item addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenField {
    Primary,
    Refresh,
}

impl std::fmt::Display for TokenField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenField::Primary => write!(f, "primary"),
            TokenField::Refresh => write!(f, "refresh"),
        }
    }
}

/// One rotation candidate surfaced by a stale scan.
///
/// `Unsealed` is a token field that was recorded but never sealed under the
/// registry; the coordinator reports it instead of silently skipping.
#[derive(Debug, Clone)]
pub enum RotationItem {
    Sealed {
        id: String,
        field: TokenField,
        blob: EncryptedBlob,
    },
    Unsealed {
        id: String,
        field: TokenField,
    },
}

/// Secret and version persistence.
pub trait SecretStore: Send + Sync {
    /// Fetch a secret by id within a vault.
    fn secret(&self, vault_id: &str, secret_id: &str) -> Result<Option<SecretRecord>>;

    /// Fetch a secret by key name within a vault.
    fn secret_by_key(&self, vault_id: &str, key: &str) -> Result<Option<SecretRecord>>;

    /// All secrets in a vault.
    fn list_secrets(&self, vault_id: &str) -> Result<Vec<SecretRecord>>;

    /// Insert or overwrite a secret record as one write.
    fn put_secret(&self, record: SecretRecord) -> Result<()>;

    /// Remove a vault's secrets, cascading their versions. Returns the number
    /// of secrets removed.
    fn delete_vault(&self, vault_id: &VaultId) -> Result<usize>;

    /// All history entries for a secret, unordered.
    fn versions(&self, vault_id: &str, secret_id: &SecretId) -> Result<Vec<SecretVersion>>;

    /// Fetch one history entry by the (version, secret, vault) triple.
    fn version(
        &self,
        vault_id: &str,
        secret_id: &str,
        version_id: &str,
    ) -> Result<Option<SecretVersion>>;

    /// Append a history entry.
    fn put_version(&self, version: SecretVersion) -> Result<()>;

    /// Delete history entries by id for a secret.
    fn delete_versions(&self, vault_id: &str, secret_id: &str, ids: &[String]) -> Result<()>;
}

/// Scan/update surface used by the rotation coordinator.
pub trait RotationStore: Send + Sync {
    /// Total records in a category, regardless of key version.
    fn record_total(&self, category: RecordCategory) -> Result<usize>;

    /// All items in a category not sealed under `current_version`, including
    /// unsealed token fields.
    fn stale_items(
        &self,
        category: RecordCategory,
        current_version: u32,
    ) -> Result<Vec<RotationItem>>;

    /// Persist a re-encrypted blob (ciphertext, iv, tag, and version) for one
    /// record field as a single write.
    fn persist_rotated(
        &self,
        category: RecordCategory,
        id: &str,
        field: TokenField,
        blob: EncryptedBlob,
    ) -> Result<()>;
}
