use serde::{Deserialize, Serialize};

use flowconf_document::Position;

/// Severity level of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A position-anchored finding, rendered identically whether it came
/// from a structural rule or from the schema validation pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity level
    pub severity: Severity,

    /// Human-readable message
    pub message: String,

    /// 1-based source anchor
    pub line: usize,
    pub column: usize,
    pub end_line: usize,
    pub end_column: usize,

    /// Structural key path the finding refers to, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<String>>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, position: Position) -> Self {
        Self::new(Severity::Error, message, position)
    }

    pub fn warning(message: impl Into<String>, position: Position) -> Self {
        Self::new(Severity::Warning, message, position)
    }

    fn new(severity: Severity, message: impl Into<String>, position: Position) -> Self {
        Self {
            severity,
            message: message.into(),
            line: position.line,
            column: position.column,
            end_line: position.line,
            end_column: position.column,
            path: None,
        }
    }

    pub fn with_path(mut self, path: Vec<String>) -> Self {
        self.path = Some(path);
        self
    }

    pub fn with_end(mut self, end: Position) -> Self {
        self.end_line = end.line;
        self.end_column = end.column;
        self
    }

    /// Identity used when merging validator outputs: identical findings
    /// reported by multiple sources collapse to one.
    pub fn dedup_key(&self) -> (Severity, String, usize, usize, Option<Vec<String>>) {
        (
            self.severity,
            self.message.clone(),
            self.line,
            self.column,
            self.path.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let diag = Diagnostic::error("boom", Position::new(3, 5));
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!((diag.line, diag.column), (3, 5));
        assert_eq!((diag.end_line, diag.end_column), (3, 5));
        assert!(diag.path.is_none());
    }

    #[test]
    fn test_dedup_key_distinguishes_severity() {
        let warn = Diagnostic::warning("same text", Position::new(1, 1));
        let err = Diagnostic::error("same text", Position::new(1, 1));
        assert_ne!(warn.dedup_key(), err.dedup_key());
    }
}
