//! Shared utility functions.

use std::sync::LazyLock;

use regex::Regex;

static INTERVIEW_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*[—-]\s*Interview Reference\b").unwrap());

/// Convert a folder name to a slug.
///
/// Every non-alphanumeric character becomes `-`, leading and trailing dashes
/// are dropped, and the result is lowercased.
/// "Factory_Method" -> "factory-method"
pub fn slugify(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .trim_matches('-')
        .to_lowercase()
}

/// Remove an "— Interview Reference" marker from a title.
pub fn strip_interview_suffix(title: &str) -> String {
    INTERVIEW_SUFFIX.replace_all(title, "").trim().to_string()
}

/// Turn a folder name into a readable fallback title.
///
/// "chain-of_responsibility" -> "chain of responsibility"
pub fn spaced_name(name: &str) -> String {
    name.replace(['-', '_'], " ").trim().to_string()
}

/// Escape HTML special characters.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Render a path with forward slashes, for use in links.
pub fn to_href(path: &std::path::Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
