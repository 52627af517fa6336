//! Sync between the vault and an external deployment provider.
//!
//! Plans are computed from current state and carry no transaction log, so
//! re-running an execute after a partial failure converges instead of
//! double-applying. Deletion of provider-only keys is an explicit opt-in.

use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::core::access::{Caller, CapabilityLevel, CapabilityResolver};
use crate::error::{ProviderError, Result};

/// Uniform contract implemented per deployment platform (Vercel, Railway,
/// Netlify, ...). Adapters are external collaborators; the sync engine only
/// depends on this surface.
pub trait ProviderAdapter: Send + Sync {
    /// Current secrets for an environment on the provider.
    fn list_secrets(&self, environment: &str) -> Result<BTreeMap<String, String>>;

    fn create_secret(&self, environment: &str, key: &str, value: &str) -> Result<()>;

    fn update_secret(&self, environment: &str, key: &str, value: &str) -> Result<()>;

    fn delete_secret(&self, environment: &str, key: &str) -> Result<()>;
}

/// What a provider sync would do, as sorted key lists.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProviderSyncPlan {
    /// Vault keys absent on the provider.
    pub to_create: Vec<String>,
    /// Keys present on both with a different value.
    pub to_update: Vec<String>,
    /// Provider-only keys; empty unless deletion was opted into.
    pub to_delete: Vec<String>,
    /// Keys already matching.
    pub to_skip: Vec<String>,
}

impl ProviderSyncPlan {
    /// Whether executing this plan would change nothing.
    pub fn is_noop(&self) -> bool {
        self.to_create.is_empty() && self.to_update.is_empty() && self.to_delete.is_empty()
    }
}

/// Counts of applied provider operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncCounts {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
}

/// Vault↔provider synchronization over a [`ProviderAdapter`].
pub struct ProviderSync {
    adapter: Box<dyn ProviderAdapter>,
}

impl ProviderSync {
    pub fn new(adapter: Box<dyn ProviderAdapter>) -> Self {
        Self { adapter }
    }

    /// Compute a sync plan without side effects.
    ///
    /// `to_delete` stays empty unless `allow_delete` is set, so a default
    /// sync can never remove a provider secret the vault doesn't know about.
    pub fn preview(
        vault: &BTreeMap<String, String>,
        provider: &BTreeMap<String, String>,
        allow_delete: bool,
    ) -> ProviderSyncPlan {
        let mut plan = ProviderSyncPlan::default();

        for (key, value) in vault {
            match provider.get(key) {
                None => plan.to_create.push(key.clone()),
                Some(existing) if existing != value => plan.to_update.push(key.clone()),
                Some(_) => plan.to_skip.push(key.clone()),
            }
        }

        if allow_delete {
            for key in provider.keys() {
                if !vault.contains_key(key) {
                    plan.to_delete.push(key.clone());
                }
            }
        }

        plan
    }

    /// Apply a plan against the provider.
    ///
    /// The caller's capability is re-resolved here, immediately before the
    /// provider calls, never reused from when the plan was previewed: access
    /// revoked between preview and execute takes effect. Individual key
    /// failures are collected and surfaced together; already-applied keys
    /// fall into `to_skip` on the next preview, so retrying converges.
    pub fn execute(
        &self,
        caller: &Caller,
        resolver: &CapabilityResolver,
        environment: &str,
        plan: &ProviderSyncPlan,
        vault: &BTreeMap<String, String>,
    ) -> Result<SyncCounts> {
        resolver.require(caller, CapabilityLevel::Write)?;

        let mut counts = SyncCounts::default();
        let mut failed = Vec::new();

        for key in &plan.to_create {
            match vault.get(key) {
                Some(value) => match self.adapter.create_secret(environment, key, value) {
                    Ok(()) => counts.created += 1,
                    Err(err) => {
                        warn!(key = %key, error = %err, "provider create failed");
                        failed.push(key.clone());
                    }
                },
                None => {
                    // Plan computed against a different vault snapshot.
                    warn!(key = %key, "planned create has no vault value");
                    failed.push(key.clone());
                }
            }
        }

        for key in &plan.to_update {
            match vault.get(key) {
                Some(value) => match self.adapter.update_secret(environment, key, value) {
                    Ok(()) => counts.updated += 1,
                    Err(err) => {
                        warn!(key = %key, error = %err, "provider update failed");
                        failed.push(key.clone());
                    }
                },
                None => {
                    warn!(key = %key, "planned update has no vault value");
                    failed.push(key.clone());
                }
            }
        }

        for key in &plan.to_delete {
            match self.adapter.delete_secret(environment, key) {
                Ok(()) => counts.deleted += 1,
                Err(err) => {
                    warn!(key = %key, error = %err, "provider delete failed");
                    failed.push(key.clone());
                }
            }
        }

        if !failed.is_empty() {
            return Err(ProviderError::Partial { failed }.into());
        }

        info!(
            environment,
            created = counts.created,
            updated = counts.updated,
            deleted = counts.deleted,
            "provider sync applied"
        );
        Ok(counts)
    }
}
