//! Error types.
//!
//! Each subsystem has its own error enum; the top-level [`Error`] wraps them so
//! callers can match on the subsystem or bubble everything up with `?`.

use thiserror::Error;

use crate::core::access::CapabilityLevel;

/// Top-level error for all envault operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("rotation completed with {0} failed records")]
    RotationFailed(usize),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Key registry configuration errors. Fatal at process start.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("empty key set: at least one `version:hexkey` entry is required")]
    EmptyKeySet,

    #[error("malformed key entry `{0}`: expected `version:hexkey`")]
    MalformedEntry(String),

    #[error("invalid key version `{0}`: must be an integer >= 1")]
    InvalidVersion(String),

    #[error("duplicate key version {0}")]
    DuplicateVersion(u32),

    #[error("key for version {0} is not valid hex")]
    InvalidHex(u32),

    #[error("key for version {version} is {actual} bytes, expected {expected}")]
    WrongKeyLength {
        version: u32,
        expected: usize,
        actual: usize,
    },
}

/// Encryption and decryption errors.
#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("no encryption key loaded for version {0}")]
    KeyNotFound(u32),

    #[error("encryption failed")]
    EncryptionFailed,

    #[error("decryption failed: {0}")]
    DecryptionFailed(&'static str),
}

/// Authorization errors.
#[derive(Error, Debug)]
pub enum AccessError {
    #[error("permission denied: requires {required}, caller has {actual}")]
    PermissionDenied {
        required: CapabilityLevel,
        actual: CapabilityLevel,
    },

    #[error("role lookup failed for {username}: {reason}")]
    RoleLookupFailed { username: String, reason: String },
}

/// Persisted-state errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("secret not found: {0}")]
    SecretNotFound(String),

    #[error("version {version_id} not found for secret {secret_id}")]
    VersionNotFound {
        version_id: String,
        secret_id: String,
    },
}

/// External deployment-provider errors during sync execution.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("provider call failed for key {key}: {reason}")]
    CallFailed { key: String, reason: String },

    #[error("sync applied partially: {} keys failed ({})", failed.len(), failed.join(", "))]
    Partial { failed: Vec<String> },
}

pub type Result<T> = std::result::Result<T, Error>;
