//! Field-name recovery from remote validator messages.
//!
//! The remote validator reports free text with no positions. A small,
//! ordered set of message shapes covers what it is known to produce;
//! the first capture wins and the pipeline maps the name back to a
//! source position.

use std::sync::OnceLock;

use regex::Regex;

const FIELD_PATTERNS: [&str; 5] = [
    r#"(?i)field ['"`]?([A-Za-z0-9_.-]+)['"`]?"#,
    r#"(?i)property ['"`]?([A-Za-z0-9_.-]+)['"`]?"#,
    r#"(?i)unknown key ['"`]?([A-Za-z0-9_.-]+)['"`]?"#,
    r#"(?i)['"`]([A-Za-z0-9_.-]+)['"`] is required"#,
    r#"(?i)missing ['"`]?([A-Za-z0-9_.-]+)['"`]?"#,
];

fn patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        FIELD_PATTERNS
            .iter()
            .map(|pattern| Regex::new(pattern).unwrap())
            .collect()
    })
}

/// Extracts the offending field name from a validator message, if any
/// of the known shapes match.
pub fn extract_field(message: &str) -> Option<String> {
    for pattern in patterns() {
        if let Some(captures) = pattern.captures(message) {
            if let Some(name) = captures.get(1) {
                return Some(name.as_str().to_string());
            }
        }
    }
    None
}
