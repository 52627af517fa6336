//! Versioned encryption key registry.
//!
//! Parses the key configuration string, holds every loaded key generation,
//! and exposes the current (highest) version. Loaded once per process and
//! immutable after load, so shared references are safe across threads.

use std::collections::BTreeMap;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::core::constants::KEY_LEN;
use crate::core::types::KeyVersion;
use crate::error::{ConfigError, CryptoError, Result};

/// One generation of key material. Zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
struct KeyEntry {
    material: [u8; KEY_LEN],
}

/// Immutable set of versioned encryption keys.
///
/// During a rotation window the registry holds both the old and the new key,
/// so blobs sealed under either version stay decryptable with zero downtime.
pub struct KeyRegistry {
    entries: BTreeMap<KeyVersion, KeyEntry>,
    current: KeyVersion,
}

impl KeyRegistry {
    /// Parse a registry from `"<version>:<64-hex-key>[,<version>:<64-hex-key>]*"`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` on malformed hex, wrong key length, a version
    /// below 1, duplicate versions, or an empty key set.
    pub fn from_config_str(config: &str) -> Result<Self> {
        let mut entries = BTreeMap::new();

        for part in config.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (version_str, hex_key) = part
                .split_once(':')
                .ok_or_else(|| ConfigError::MalformedEntry(part.to_string()))?;

            let version: KeyVersion = version_str
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidVersion(version_str.to_string()))?;
            if version < 1 {
                return Err(ConfigError::InvalidVersion(version_str.to_string()).into());
            }

            let decoded =
                hex::decode(hex_key.trim()).map_err(|_| ConfigError::InvalidHex(version))?;
            let material: [u8; KEY_LEN] =
                decoded
                    .try_into()
                    .map_err(|v: Vec<u8>| ConfigError::WrongKeyLength {
                        version,
                        expected: KEY_LEN,
                        actual: v.len(),
                    })?;

            if entries.insert(version, KeyEntry { material }).is_some() {
                return Err(ConfigError::DuplicateVersion(version).into());
            }
        }

        let current = *entries.keys().next_back().ok_or(ConfigError::EmptyKeySet)?;

        Ok(Self { entries, current })
    }

    /// The highest loaded version. All new encryptions use it.
    pub fn current_version(&self) -> KeyVersion {
        self.current
    }

    /// Key material for a specific version.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::KeyNotFound` if the version was never loaded.
    pub fn lookup(&self, version: KeyVersion) -> Result<&[u8; KEY_LEN]> {
        self.entries
            .get(&version)
            .map(|e| &e.material)
            .ok_or_else(|| CryptoError::KeyNotFound(version).into())
    }

    /// Number of loaded key generations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty (never true after a successful load).
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for KeyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Key material never printed.
        f.debug_struct("KeyRegistry")
            .field("versions", &self.entries.keys().collect::<Vec<_>>())
            .field("current", &self.current)
            .finish()
    }
}
