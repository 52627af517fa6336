//! Encrypted token fields outside the secret vault.
//!
//! Provider connections and user sessions carry bearer tokens that rotate
//! with the same key registry as secrets.

use serde::{Deserialize, Serialize};

use crate::core::crypto::EncryptedBlob;

/// State of an optional encrypted token field.
///
/// Distinguishes "this connection intentionally has no refresh token" from
/// "a token was recorded but never sealed under the registry". Rotation skips
/// `Absent` silently and reports `Pending` as a failure instead of silently
/// skipping it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TokenSlot {
    Absent,
    Pending,
    Sealed { blob: EncryptedBlob },
}

impl TokenSlot {
    pub fn is_sealed(&self) -> bool {
        matches!(self, TokenSlot::Sealed { .. })
    }
}

/// A connection to an external deployment provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConnection {
    pub id: String,
    pub provider: String,
    pub access_token: EncryptedBlob,
    #[serde(default = "TokenSlot::default")]
    pub refresh_token: TokenSlot,
}

impl Default for TokenSlot {
    fn default() -> Self {
        TokenSlot::Absent
    }
}

/// A user's stored VCS access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserToken {
    pub id: String,
    pub username: String,
    pub token: EncryptedBlob,
}
