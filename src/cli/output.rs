//! Shared CLI output helpers.

/// Print a success message with checkmark.
pub fn success(msg: &str) {
    println!("✓ {}", msg);
}

/// Print an error message to stderr.
pub fn error(msg: &str) {
    eprintln!("✗ {}", msg);
}

/// Print a follow-up hint to stderr.
pub fn hint(msg: &str) {
    eprintln!("  hint: {}", msg);
}

/// Print a section header.
pub fn header(msg: &str) {
    println!("{}:", msg);
}

/// Print an indented list item.
pub fn item(prefix: &str, key: &str) {
    println!("  {} {}", prefix, key);
}
