//! Diff computation between local .env and vault state.
//!
//! Both diffs partition the union of local and vault keys exactly: every key
//! lands in one list and only one. Values compare as exact bytes; no
//! whitespace normalization happens here. Output lists are lexicographically
//! sorted for deterministic display.

use std::collections::BTreeMap;

/// Diff in the local→vault direction: what a push would do.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PushDiff {
    /// Keys in local absent from the vault.
    pub added: Vec<String>,
    /// Keys present in both with differing values.
    pub changed: Vec<String>,
    /// Keys in the vault absent from local.
    pub removed: Vec<String>,
}

impl PushDiff {
    /// Whether a push would be a no-op.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.changed.is_empty() && self.removed.is_empty()
    }
}

/// Diff in the vault→local direction: the vault is authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PullDiff {
    /// Vault keys absent locally.
    pub added: Vec<String>,
    /// Keys present in both with differing values.
    pub changed: Vec<String>,
    /// Local-only keys. Reported, never implied as deletable.
    pub local_only: Vec<String>,
    /// Keys with equal values on both sides.
    pub unchanged: Vec<String>,
}

impl PullDiff {
    /// Whether local already matches the vault (local-only keys aside).
    pub fn is_synced(&self) -> bool {
        self.added.is_empty() && self.changed.is_empty()
    }
}

/// Compute what pushing `local` into `vault` would change.
pub fn push_diff(local: &BTreeMap<String, String>, vault: &BTreeMap<String, String>) -> PushDiff {
    let mut diff = PushDiff::default();

    for (key, value) in local {
        match vault.get(key) {
            None => diff.added.push(key.clone()),
            Some(existing) if existing != value => diff.changed.push(key.clone()),
            Some(_) => {}
        }
    }

    for key in vault.keys() {
        if !local.contains_key(key) {
            diff.removed.push(key.clone());
        }
    }

    // BTreeMap iteration is already ordered; changed/added come out sorted,
    // and removed too. Kept explicit for non-map callers of the struct.
    diff
}

/// Compute what pulling `vault` over `local` would change.
pub fn pull_diff(local: &BTreeMap<String, String>, vault: &BTreeMap<String, String>) -> PullDiff {
    let mut diff = PullDiff::default();

    for (key, value) in vault {
        match local.get(key) {
            None => diff.added.push(key.clone()),
            Some(existing) if existing != value => diff.changed.push(key.clone()),
            Some(_) => diff.unchanged.push(key.clone()),
        }
    }

    for key in local.keys() {
        if !vault.contains_key(key) {
            diff.local_only.push(key.clone());
        }
    }

    diff
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_push_diff_mixed() {
        let local = map(&[("A", "1"), ("B", "2")]);
        let vault = map(&[("B", "old"), ("C", "3")]);

        let diff = push_diff(&local, &vault);

        assert_eq!(diff.added, vec!["A"]);
        assert_eq!(diff.changed, vec!["B"]);
        assert_eq!(diff.removed, vec!["C"]);
        assert!(!diff.is_empty());
    }

    #[test]
    fn test_push_diff_partitions_union() {
        let local = map(&[("A", "1"), ("B", "2"), ("C", "same")]);
        let vault = map(&[("B", "x"), ("C", "same"), ("D", "4")]);

        let diff = push_diff(&local, &vault);

        let mut seen = BTreeSet::new();
        // "same" keys land in no push list; union partition covers the three
        // lists plus the implicit unchanged set.
        for key in diff.added.iter().chain(&diff.changed).chain(&diff.removed) {
            assert!(seen.insert(key.clone()), "key {} appeared twice", key);
        }
        assert!(!seen.contains("C"));

        // added ∪ changed ⊆ keys(local), removed == keys(vault) \ keys(local)
        for key in diff.added.iter().chain(&diff.changed) {
            assert!(local.contains_key(key));
        }
        assert_eq!(diff.removed, vec!["D"]);
    }

    #[test]
    fn test_push_diff_identical_maps() {
        let both = map(&[("A", "1"), ("B", "2")]);
        assert!(push_diff(&both, &both).is_empty());
    }

    #[test]
    fn test_pull_diff_empty_local() {
        let local = map(&[]);
        let vault = map(&[("A", "1"), ("B", "2")]);

        let diff = pull_diff(&local, &vault);

        assert_eq!(diff.added, vec!["A", "B"]);
        assert!(diff.changed.is_empty());
        assert!(diff.local_only.is_empty());
        assert!(diff.unchanged.is_empty());
    }

    #[test]
    fn test_pull_diff_partitions_vault_keys() {
        let local = map(&[("A", "1"), ("B", "old"), ("LOCAL", "x")]);
        let vault = map(&[("A", "1"), ("B", "new"), ("C", "3")]);

        let diff = pull_diff(&local, &vault);

        assert_eq!(diff.unchanged, vec!["A"]);
        assert_eq!(diff.changed, vec!["B"]);
        assert_eq!(diff.added, vec!["C"]);
        assert_eq!(diff.local_only, vec!["LOCAL"]);

        // unchanged ⊔ changed ⊔ added == keys(vault)
        let mut covered: Vec<_> = diff
            .unchanged
            .iter()
            .chain(&diff.changed)
            .chain(&diff.added)
            .cloned()
            .collect();
        covered.sort();
        assert_eq!(covered, vault.keys().cloned().collect::<Vec<_>>());
    }

    #[test]
    fn test_pull_diff_is_synced() {
        let local = map(&[("A", "1"), ("EXTRA", "x")]);
        let vault = map(&[("A", "1")]);

        let diff = pull_diff(&local, &vault);
        assert!(diff.is_synced());
        assert_eq!(diff.local_only, vec!["EXTRA"]);
    }

    #[test]
    fn test_values_compare_as_exact_bytes() {
        // Trailing whitespace is a real difference, not noise.
        let local = map(&[("A", "value ")]);
        let vault = map(&[("A", "value")]);

        assert_eq!(push_diff(&local, &vault).changed, vec!["A"]);
        assert_eq!(pull_diff(&local, &vault).changed, vec!["A"]);
    }

    #[test]
    fn test_lists_sorted_lexicographically() {
        let local = map(&[("ZED", "1"), ("ALPHA", "2"), ("MID", "3")]);
        let vault = map(&[]);

        let diff = push_diff(&local, &vault);
        assert_eq!(diff.added, vec!["ALPHA", "MID", "ZED"]);
    }
}
