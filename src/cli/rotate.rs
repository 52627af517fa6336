//! Rotate command - batch re-encryption to the current key version.

use tracing::info;

use crate::cli::output;
use crate::core::crypto::EncryptionEngine;
use crate::core::keys::KeyRegistry;
use crate::core::rotation::{RotationCoordinator, RotationOptions};
use crate::core::store::MemoryStore;
use crate::error::{Error, Result};

/// Execute key rotation over a snapshot store.
pub fn execute(
    store_path: &str,
    registry: &KeyRegistry,
    dry_run: bool,
    batch_size: usize,
) -> Result<()> {
    info!(store = store_path, dry_run, batch_size, "starting rotation");

    let store = MemoryStore::load_json(store_path)?;
    let engine = EncryptionEngine::new(registry);
    let coordinator = RotationCoordinator::new(
        &store,
        &engine,
        RotationOptions {
            dry_run,
            batch_size,
        },
    );

    let report = coordinator.run()?;
    print!("{}", report);

    if !dry_run {
        store.save_json(store_path)?;
    }

    if !report.ok() {
        return Err(Error::RotationFailed(report.failed()));
    }

    if dry_run {
        output::success("dry run complete, no writes performed");
    } else {
        output::success(&format!("rotated {} records", report.rotated()));
    }
    Ok(())
}
