//! Secret record and version types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::crypto::EncryptedBlob;
use crate::core::types::{Actor, SecretId, SecretKey, VaultId};

/// The live encrypted value of one secret in one vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretRecord {
    pub id: SecretId,
    pub vault_id: VaultId,
    pub key: SecretKey,
    pub blob: EncryptedBlob,
    pub updated_at: DateTime<Utc>,
    pub last_modified_by: Actor,
}

/// An append-only history entry holding a secret's pre-update blob.
///
/// `version_number` is strictly increasing per secret, starting at 1. Numbers
/// are never reused, even after old entries are pruned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretVersion {
    pub id: String,
    pub secret_id: SecretId,
    pub vault_id: VaultId,
    pub version_number: u32,
    pub blob: EncryptedBlob,
    pub created_by: Actor,
    pub created_at: DateTime<Utc>,
}

impl SecretVersion {
    /// Metadata view of this entry, with no ciphertext attached.
    pub fn meta(&self) -> VersionMeta {
        VersionMeta {
            id: self.id.clone(),
            version_number: self.version_number,
            key_version: self.blob.key_version,
            created_by: self.created_by.clone(),
            created_at: self.created_at,
        }
    }
}

/// Listing view of a history entry. Carries no encrypted or decrypted value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionMeta {
    pub id: String,
    pub version_number: u32,
    pub key_version: u32,
    pub created_by: Actor,
    pub created_at: DateTime<Utc>,
}
