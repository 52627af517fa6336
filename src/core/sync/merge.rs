//! Pull-time merge of vault content into a local .env file.
//!
//! The vault's raw content is emitted verbatim so comments and blank-line
//! structure survive a pull. Keys that exist only locally are appended in a
//! single delimited block instead of being dropped: a pull can never silently
//! discard a developer's local-only variable.

use std::collections::BTreeMap;

use crate::core::constants::LOCAL_ONLY_HEADER;
use crate::core::env;

/// Merge the vault's rendered content with a local key map.
///
/// Emits `vault_content` with trailing newlines trimmed, then, if any key
/// exists in `local` but not `vault`, one `# Local variables (not in vault)`
/// block listing those keys in ascending order.
pub fn merge(
    vault_content: &str,
    local: &BTreeMap<String, String>,
    vault: &BTreeMap<String, String>,
) -> String {
    let mut output = vault_content.trim_end_matches('\n').to_string();

    let local_only: Vec<(&String, &String)> = local
        .iter()
        .filter(|(key, _)| !vault.contains_key(*key))
        .collect();

    if !local_only.is_empty() {
        output.push_str("\n\n");
        output.push_str(LOCAL_ONLY_HEADER);
        for (key, value) in local_only {
            output.push('\n');
            output.push_str(&env::render_line(key, value));
        }
    }

    output.push('\n');
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_merge_without_local_only_is_vault_verbatim() {
        let content = "# production settings\nA=1\n\nB=2\n";
        let vault = map(&[("A", "1"), ("B", "2")]);
        let local = map(&[("A", "old")]);

        let merged = merge(content, &local, &vault);

        assert_eq!(merged, "# production settings\nA=1\n\nB=2\n");
        assert!(!merged.contains(LOCAL_ONLY_HEADER));
    }

    #[test]
    fn test_merge_appends_local_only_block() {
        let content = "A=1\n";
        let vault = map(&[("A", "1")]);
        let local = map(&[("A", "1"), ("DEBUG", "true"), ("CACHE", "off")]);

        let merged = merge(content, &local, &vault);

        assert_eq!(
            merged,
            "A=1\n\n# Local variables (not in vault)\nCACHE=off\nDEBUG=true\n"
        );
    }

    #[test]
    fn test_merge_trims_trailing_newlines() {
        let content = "A=1\n\n\n\n";
        let vault = map(&[("A", "1")]);
        let local = map(&[("LOCAL", "x")]);

        let merged = merge(content, &local, &vault);
        assert!(merged.starts_with("A=1\n\n# Local"));
    }

    #[test]
    fn test_merge_preserves_comments_and_blank_lines() {
        let content = "# header\n\nA=1\n# trailing note\nB=2";
        let vault = map(&[("A", "1"), ("B", "2")]);
        let merged = merge(content, &map(&[]), &vault);

        assert_eq!(merged, "# header\n\nA=1\n# trailing note\nB=2\n");
    }

    #[test]
    fn test_merge_quotes_local_values_needing_it() {
        let content = "A=1\n";
        let vault = map(&[("A", "1")]);
        let local = map(&[("MSG", "hello world")]);

        let merged = merge(content, &local, &vault);
        assert!(merged.contains("MSG=\"hello world\"\n"));
    }

    #[test]
    fn test_parse_of_merge_is_vault_plus_local_only() {
        let vault = map(&[("A", "1"), ("B", "2")]);
        let local = map(&[("A", "stale"), ("DEBUG", "true")]);
        let content = crate::core::env::render(&vault);

        let parsed = crate::core::env::parse(&merge(&content, &local, &vault));

        let mut expected = vault.clone();
        expected.insert("DEBUG".to_string(), "true".to_string());
        assert_eq!(parsed, expected);
    }
}
