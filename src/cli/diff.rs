//! Diff command - compare a local .env file against a vault.

use crate::cli::{decrypted_vault, output};
use crate::core::crypto::EncryptionEngine;
use crate::core::env;
use crate::core::keys::KeyRegistry;
use crate::core::store::MemoryStore;
use crate::core::sync::{pull_diff, push_diff};
use crate::error::Result;

/// Execute the diff command.
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

    let push = push_diff(&local, &vault);
    let pull = pull_diff(&local, &vault);

    if push.is_empty() {
        output::success("local and vault are in sync");
        return Ok(());
    }

    output::header("push (local -> vault)");
    for key in &push.added {
        output::item("+", key);
    }
    for key in &push.changed {
        output::item("~", key);
    }
    for key in &push.removed {
        output::item("-", key);
    }

    output::header("pull (vault -> local)");
    for key in &pull.added {
        output::item("+", key);
    }
    for key in &pull.changed {
        output::item("~", key);
    }
    for key in &pull.local_only {
        output::item("local-only", key);
    }

    Ok(())
}
