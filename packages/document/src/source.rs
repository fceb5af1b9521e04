//! Line-level helpers shared by the context resolver and position mapper.

use serde::{Deserialize, Serialize};

/// 1-based line/column anchor into the raw document text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Coarsest fallback anchor when nothing better can be recovered.
    pub fn document_start() -> Self {
        Self { line: 1, column: 1 }
    }
}

/// Leading-whitespace width of a line.
pub fn indent_width(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

pub fn is_blank_or_comment(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

/// Key text of a `key:` or `key: value` line.
///
/// Returns `None` for blank lines, comments, sequence items and lines
/// without a colon; callers skip those rather than failing.
pub fn line_key(line: &str) -> Option<&str> {
    if is_blank_or_comment(line) {
        return None;
    }
    let (key, _) = line.trim().split_once(':')?;
    let key = key.trim().trim_matches('"').trim_matches('\'');
    if key.is_empty() || key.starts_with('-') {
        return None;
    }
    Some(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indent_width() {
        assert_eq!(indent_width("receivers:"), 0);
        assert_eq!(indent_width("  otlp:"), 2);
        assert_eq!(indent_width("    timeout: 10s"), 4);
    }

    #[test]
    fn test_line_key() {
        assert_eq!(line_key("receivers:"), Some("receivers"));
        assert_eq!(line_key("  timeout: 10s"), Some("timeout"));
        assert_eq!(line_key("  \"quoted\": 1"), Some("quoted"));
        assert_eq!(line_key("plain text"), None);
        assert_eq!(line_key("# comment:"), None);
        assert_eq!(line_key("  - item: 1"), None);
        assert_eq!(line_key(""), None);
    }
}
