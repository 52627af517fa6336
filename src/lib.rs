//! Envault - a GitHub-native secrets manager core.
//!
//! Access to a repository implies access to its secrets. This crate holds the
//! part of the system where a bug means secret loss or disclosure: versioned
//! authenticated encryption, bounded version history with restore, batch key
//! rotation, and the sync engine that reconciles a local .env file, the
//! encrypted vault, and an external deployment provider.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── rotate        # Batch re-encryption to the current key version
//! │   ├── diff          # Local .env vs vault comparison
//! │   └── pull          # Merge vault content into a local .env
//! └── core/             # Core library components
//!     ├── crypto        # AES-256-GCM seal/open (EncryptionEngine)
//!     ├── keys          # Versioned key registry
//!     ├── access        # VCS role -> capability level authorization
//!     ├── env           # .env file parsing and rendering
//!     ├── domain/       # Secret records, versions, token slots
//!     ├── store/        # Persistence traits + in-memory/JSON store
//!     ├── history       # Bounded per-secret version ledger
//!     ├── rotation      # Key rotation coordinator
//!     └── sync/         # Diff, merge, and provider sync
//! ```
//!
//! # Features
//!
//! - AES-256-GCM encryption under named key versions
//! - Zero-downtime key rotation with a dual-key window
//! - Bounded, restorable per-secret version history
//! - Deterministic three-plane diff/merge (local / vault / provider)
//! - Capability-level authorization derived from VCS roles

pub mod cli;
pub mod core;
pub mod error;
