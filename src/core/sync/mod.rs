//! Three-plane synchronization.
//!
//! Reconciles the three places a secret lives: the developer's local .env
//! file, the encrypted vault, and an external deployment provider. Diff and
//! merge are pure functions over already-decrypted key maps; only provider
//! execution has side effects.

mod diff;
mod merge;
mod provider;

pub use diff::{pull_diff, push_diff, PullDiff, PushDiff};
pub use merge::merge;
pub use provider::{ProviderAdapter, ProviderSync, ProviderSyncPlan, SyncCounts};
