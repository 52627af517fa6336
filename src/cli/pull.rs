//! Pull command - merge vault content into a local .env file.

use tracing::info;

use crate::cli::{decrypted_vault, output};
use crate::core::crypto::EncryptionEngine;
use crate::core::env;
use crate::core::keys::KeyRegistry;
use crate::core::store::MemoryStore;
use crate::core::sync::merge;
use crate::error::Result;

/// Execute the pull command.
pub fn execute(
    store_path: &str,
    registry: &KeyRegistry,
    vault_id: &str,
    env_file: &str,
) -> Result<()> {
    let store = MemoryStore::load_json(store_path)?;
    let engine = EncryptionEngine::new(registry);

    let vault = decrypted_vault(&store, &engine, vault_id)?;
    let local = match std::fs::read_to_string(env_file) {
        Ok(content) => env::parse(&content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Default::default(),
        Err(e) => return Err(e.into()),
    };

    let merged = merge(&env::render(&vault), &local, &vault);
    std::fs::write(env_file, &merged)?;

    let local_only = local.keys().filter(|k| !vault.contains_key(*k)).count();
    info!(vault = vault_id, env_file, local_only, "pulled vault into env file");
    output::success(&format!(
        "pulled {} secrets into {} ({} local-only kept)",
        vault.len(),
        env_file,
        local_only
    ));
    Ok(())
}
