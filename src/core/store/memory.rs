//! In-memory store with JSON snapshot persistence.
//!
//! The reference `SecretStore`/`RotationStore` implementation. State lives
//! behind one `RwLock`, so every trait call is a single atomic read or write.
//! The CLI loads and saves the whole state as a JSON snapshot file.

use std::path::Path;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::core::crypto::EncryptedBlob;
use crate::core::domain::{ProviderConnection, SecretRecord, SecretVersion, TokenSlot, UserToken};
use crate::core::store::{RecordCategory, RotationItem, RotationStore, SecretStore, TokenField};
use crate::core::types::{SecretId, VaultId};
use crate::error::{Result, StoreError};

#[derive(Debug, Default, Serialize, Deserialize)]
struct State {
    #[serde(default)]
    secrets: Vec<SecretRecord>,
    #[serde(default)]
    versions: Vec<SecretVersion>,
    #[serde(default)]
    connections: Vec<ProviderConnection>,
    #[serde(default)]
    user_tokens: Vec<UserToken>,
}

/// In-memory secret state, optionally snapshotted to a JSON file.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a store from a JSON snapshot file.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let state: State = serde_json::from_str(&contents)?;
        Ok(Self {
            state: RwLock::new(state),
        })
    }

    /// Write the current state to a JSON snapshot file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let state = self.state.read().expect("store lock poisoned");
        let json = serde_json::to_string_pretty(&*state)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Insert a provider connection (test and bootstrap helper).
    pub fn put_connection(&self, connection: ProviderConnection) {
        let mut state = self.state.write().expect("store lock poisoned");
        state.connections.retain(|c| c.id != connection.id);
        state.connections.push(connection);
    }

    /// Insert a user token (test and bootstrap helper).
    pub fn put_user_token(&self, token: UserToken) {
        let mut state = self.state.write().expect("store lock poisoned");
        state.user_tokens.retain(|t| t.id != token.id);
        state.user_tokens.push(token);
    }

    /// Fetch a provider connection by id.
    pub fn connection(&self, id: &str) -> Option<ProviderConnection> {
        let state = self.state.read().expect("store lock poisoned");
        state.connections.iter().find(|c| c.id == id).cloned()
    }

    /// Fetch a user token by id.
    pub fn user_token(&self, id: &str) -> Option<UserToken> {
        let state = self.state.read().expect("store lock poisoned");
        state.user_tokens.iter().find(|t| t.id == id).cloned()
    }
}

impl SecretStore for MemoryStore {
    fn secret(&self, vault_id: &str, secret_id: &str) -> Result<Option<SecretRecord>> {
        let state = self.state.read().expect("store lock poisoned");
        Ok(state
            .secrets
            .iter()
            .find(|s| s.vault_id == vault_id && s.id == secret_id)
            .cloned())
    }

    fn secret_by_key(&self, vault_id: &str, key: &str) -> Result<Option<SecretRecord>> {
        let state = self.state.read().expect("store lock poisoned");
        Ok(state
            .secrets
            .iter()
            .find(|s| s.vault_id == vault_id && s.key == key)
            .cloned())
    }

    fn list_secrets(&self, vault_id: &str) -> Result<Vec<SecretRecord>> {
        let state = self.state.read().expect("store lock poisoned");
        let mut secrets: Vec<_> = state
            .secrets
            .iter()
            .filter(|s| s.vault_id == vault_id)
            .cloned()
            .collect();
        secrets.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(secrets)
    }

    fn put_secret(&self, record: SecretRecord) -> Result<()> {
        let mut state = self.state.write().expect("store lock poisoned");
        state
            .secrets
            .retain(|s| !(s.vault_id == record.vault_id && s.id == record.id));
        state.secrets.push(record);
        Ok(())
    }

    fn delete_vault(&self, vault_id: &VaultId) -> Result<usize> {
        let mut state = self.state.write().expect("store lock poisoned");
        let before = state.secrets.len();
        state.secrets.retain(|s| &s.vault_id != vault_id);
        state.versions.retain(|v| &v.vault_id != vault_id);
        Ok(before - state.secrets.len())
    }

    fn versions(&self, vault_id: &str, secret_id: &SecretId) -> Result<Vec<SecretVersion>> {
        let state = self.state.read().expect("store lock poisoned");
        Ok(state
            .versions
            .iter()
            .filter(|v| v.vault_id == vault_id && &v.secret_id == secret_id)
            .cloned()
            .collect())
    }

    fn version(
        &self,
        vault_id: &str,
        secret_id: &str,
        version_id: &str,
    ) -> Result<Option<SecretVersion>> {
        let state = self.state.read().expect("store lock poisoned");
        Ok(state
            .versions
            .iter()
            .find(|v| v.vault_id == vault_id && v.secret_id == secret_id && v.id == version_id)
            .cloned())
    }

    fn put_version(&self, version: SecretVersion) -> Result<()> {
        let mut state = self.state.write().expect("store lock poisoned");
        state.versions.push(version);
        Ok(())
    }

    fn delete_versions(&self, vault_id: &str, secret_id: &str, ids: &[String]) -> Result<()> {
        let mut state = self.state.write().expect("store lock poisoned");
        state.versions.retain(|v| {
            !(v.vault_id == vault_id && v.secret_id == secret_id && ids.contains(&v.id))
        });
        Ok(())
    }
}

impl RotationStore for MemoryStore {
    fn record_total(&self, category: RecordCategory) -> Result<usize> {
        let state = self.state.read().expect("store lock poisoned");
        Ok(match category {
            RecordCategory::Secrets => state.secrets.len(),
            RecordCategory::ConnectionTokens => state.connections.len(),
            RecordCategory::UserTokens => state.user_tokens.len(),
        })
    }

    fn stale_items(
        &self,
        category: RecordCategory,
        current_version: u32,
    ) -> Result<Vec<RotationItem>> {
        let state = self.state.read().expect("store lock poisoned");
        let mut items = Vec::new();

        match category {
            RecordCategory::Secrets => {
                for secret in &state.secrets {
                    if secret.blob.key_version != current_version {
                        items.push(RotationItem::Sealed {
                            id: secret.id.clone(),
                            field: TokenField::Primary,
                            blob: secret.blob.clone(),
                        });
                    }
                }
            }
            RecordCategory::ConnectionTokens => {
                for conn in &state.connections {
                    if conn.access_token.key_version != current_version {
                        items.push(RotationItem::Sealed {
                            id: conn.id.clone(),
                            field: TokenField::Primary,
                            blob: conn.access_token.clone(),
                        });
                    }
                    match &conn.refresh_token {
                        TokenSlot::Absent => {}
                        TokenSlot::Pending => items.push(RotationItem::Unsealed {
                            id: conn.id.clone(),
                            field: TokenField::Refresh,
                        }),
                        TokenSlot::Sealed { blob } if blob.key_version != current_version => {
                            items.push(RotationItem::Sealed {
                                id: conn.id.clone(),
                                field: TokenField::Refresh,
                                blob: blob.clone(),
                            });
                        }
                        TokenSlot::Sealed { .. } => {}
                    }
                }
            }
            RecordCategory::UserTokens => {
                for token in &state.user_tokens {
                    if token.token.key_version != current_version {
                        items.push(RotationItem::Sealed {
                            id: token.id.clone(),
                            field: TokenField::Primary,
                            blob: token.token.clone(),
                        });
                    }
                }
            }
        }

        Ok(items)
    }

    fn persist_rotated(
        &self,
        category: RecordCategory,
        id: &str,
        field: TokenField,
        blob: EncryptedBlob,
    ) -> Result<()> {
        let mut state = self.state.write().expect("store lock poisoned");

        match category {
            RecordCategory::Secrets => {
                let secret = state
                    .secrets
                    .iter_mut()
                    .find(|s| s.id == id)
                    .ok_or_else(|| StoreError::SecretNotFound(id.to_string()))?;
                secret.blob = blob;
            }
            RecordCategory::ConnectionTokens => {
                let conn = state
                    .connections
                    .iter_mut()
                    .find(|c| c.id == id)
                    .ok_or_else(|| StoreError::SecretNotFound(id.to_string()))?;
                match field {
                    TokenField::Primary => conn.access_token = blob,
                    TokenField::Refresh => conn.refresh_token = TokenSlot::Sealed { blob },
                }
            }
            RecordCategory::UserTokens => {
                let token = state
                    .user_tokens
                    .iter_mut()
                    .find(|t| t.id == id)
                    .ok_or_else(|| StoreError::SecretNotFound(id.to_string()))?;
                token.token = blob;
            }
        }

        Ok(())
    }
}
