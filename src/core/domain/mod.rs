//! Domain entities.
//!
//! The persisted shapes this crate protects: secret records, their bounded
//! version history, and the encrypted token fields of provider connections
//! and user sessions.

mod secret;
mod token;

pub use secret::{SecretRecord, SecretVersion, VersionMeta};
pub use token::{ProviderConnection, TokenSlot, UserToken};
