//! Constants used throughout envault.
//!
//! Centralizes magic numbers and configuration values.

use crate::core::types::KeyVersion;

/// Maximum retained history entries per secret; oldest pruned after each insert.
pub const MAX_VERSIONS_PER_SECRET: usize = 10;

/// Key version assumed for records written before versions were recorded.
///
/// Deliberately an explicit constant: "no version recorded" means this, never
/// version 0.
pub const DEFAULT_KEY_VERSION: KeyVersion = 1;

/// AES-256 key length in bytes.
pub const KEY_LEN: usize = 32;

/// AES-GCM initialization vector length in bytes (96 bits).
pub const IV_LEN: usize = 12;

/// AES-GCM authentication tag length in bytes (128 bits).
pub const TAG_LEN: usize = 16;

/// Default number of records re-encrypted per rotation batch.
pub const DEFAULT_ROTATION_BATCH: usize = 100;

/// Environment variable holding the key registry config string.
pub const KEYS_ENV: &str = "ENVAULT_ENCRYPTION_KEYS";

/// Header of the block appended by merge for keys that exist only locally.
pub const LOCAL_ONLY_HEADER: &str = "# Local variables (not in vault)";
