//! Type aliases for domain concepts.
//!
//! Provides semantic type aliases to make function signatures more descriptive.

/// A secret key name (e.g., DATABASE_URL, API_KEY).
pub type SecretKey = String;

/// An integer identifying one generation of encryption key.
///
/// Always >= 1; enables decrypting old data while new data uses a newer key.
pub type KeyVersion = u32;

/// A vault (environment) identifier.
pub type VaultId = String;

/// A secret record identifier.
pub type SecretId = String;

/// The user or system that performed a mutation.
pub type Actor = String;
