//! .env file parsing and rendering.
//!
//! The env-file collaborator for the sync engine: parse a dotenv-style string
//! into a key map and render a map back. Blank lines and `#` comments are
//! skipped; matching surrounding quotes are stripped on parse and re-applied
//! on render when a value needs them.

use std::collections::BTreeMap;

/// Parse dotenv-style content into a sorted key map.
///
/// Later duplicates win, matching how shells source env files.
pub fn parse(content: &str) -> BTreeMap<String, String> {
    let mut entries = BTreeMap::new();

    for line in content.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim().to_string();
            if key.is_empty() {
                continue;
            }
            entries.insert(key, parse_value(value.trim()));
        }
    }

    entries
}

/// Render a key map as dotenv content, one `KEY=value` line per entry.
///
/// Keys come out in map (ascending) order. Values containing whitespace or
/// .env-special characters are double-quoted and escaped.
pub fn render(entries: &BTreeMap<String, String>) -> String {
    let mut output = String::new();
    for (key, value) in entries {
        output.push_str(&render_line(key, value));
        output.push('\n');
    }
    output
}

/// Render a single `KEY=value` line without the trailing newline.
pub fn render_line(key: &str, value: &str) -> String {
    if needs_quotes(value) {
        format!("{}=\"{}\"", key, escape_value(value))
    } else {
        format!("{}={}", key, value)
    }
}

fn parse_value(raw: &str) -> String {
    if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        return unescape_double_quoted(&raw[1..raw.len() - 1]);
    }

    if raw.len() >= 2 && raw.starts_with('\'') && raw.ends_with('\'') {
        return raw[1..raw.len() - 1].to_string();
    }

    raw.to_string()
}

fn unescape_double_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }

        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}

fn needs_quotes(value: &str) -> bool {
    value.is_empty()
        || value.chars().any(|ch| ch.is_whitespace())
        || value.contains('#')
        || value.contains('=')
        || value.contains('"')
        || value.contains('\'')
        || value.contains('\\')
}

fn escape_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());

    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            _ => escaped.push(ch),
        }
    }

    escaped
}
