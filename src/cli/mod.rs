//! Command-line interface.

pub mod diff;
pub mod output;
pub mod pull;
pub mod rotate;

use std::collections::BTreeMap;

use clap::{Parser, Subcommand};

use crate::core::constants::{DEFAULT_ROTATION_BATCH, KEYS_ENV};
use crate::core::crypto::EncryptionEngine;
use crate::core::keys::KeyRegistry;
use crate::core::store::{MemoryStore, SecretStore};
use crate::error::Result;

/// Envault - a GitHub-native secrets manager.
#[derive(Parser)]
#[command(
    name = "envault",
    about = "A GitHub-native secrets manager: repo access is secret access",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Key registry config string: "version:hexkey[,version:hexkey]*"
    #[arg(long, global = true, env = KEYS_ENV, hide_env_values = true)]
    pub keys: Option<String>,

    /// Path to the vault state snapshot
    #[arg(long, global = true, default_value = "envault.json")]
    pub store: String,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Re-encrypt stored blobs to the current key version
    Rotate {
        /// Report what would rotate without writing anything
        #[arg(long)]
        dry_run: bool,

        /// Records re-encrypted per batch
        #[arg(long, default_value_t = DEFAULT_ROTATION_BATCH)]
        batch_size: usize,
    },

    /// Compare a local .env file against a vault
    Diff {
        /// Vault (environment) identifier
        #[arg(long)]
        vault: String,

        /// Local .env file
        #[arg(long, default_value = ".env")]
        env_file: String,
    },

    /// Merge vault content into a local .env file
    Pull {
        /// Vault (environment) identifier
        #[arg(long)]
        vault: String,

        /// Local .env file to update
        #[arg(long, default_value = ".env")]
        env_file: String,
    },
}

/// Dispatch a parsed command.
pub fn execute(cli: Cli) -> Result<()> {
    let registry = load_registry(cli.keys.as_deref())?;

    match cli.command {
        Command::Rotate {
            dry_run,
            batch_size,
        } => rotate::execute(&cli.store, &registry, dry_run, batch_size),
        Command::Diff { vault, env_file } => diff::execute(&cli.store, &registry, &vault, &env_file),
        Command::Pull { vault, env_file } => pull::execute(&cli.store, &registry, &vault, &env_file),
    }
}

fn load_registry(keys: Option<&str>) -> Result<KeyRegistry> {
    KeyRegistry::from_config_str(keys.unwrap_or_default())
}

/// Decrypt every secret in a vault into a key→plaintext map.
pub(crate) fn decrypted_vault(
    store: &MemoryStore,
    engine: &EncryptionEngine<'_>,
    vault_id: &str,
) -> Result<BTreeMap<String, String>> {
    let mut map = BTreeMap::new();
    for record in store.list_secrets(vault_id)? {
        map.insert(record.key.clone(), engine.open(&record.blob)?);
    }
    Ok(map)
}
