//! Parse attempt over the raw document text.
//!
//! The parsed tree is a plain `serde_json::Value` so that schema-level
//! work downstream speaks the same dialect as the schema registry.
//! Syntactically broken text yields a `ParseError` and nothing else;
//! all tree-based validation short-circuits on it.

use serde_json::Value;
use thiserror::Error;

use crate::kind::ComponentKind;
use crate::source::Position;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Error, Debug, Clone)]
pub enum ParseError {
    #[error("invalid document syntax: {message}")]
    Syntax {
        message: String,
        position: Option<Position>,
    },
}

impl ParseError {
    /// Best-effort location of the syntax error, if the underlying
    /// parser reported one.
    pub fn position(&self) -> Option<Position> {
        match self {
            ParseError::Syntax { position, .. } => *position,
        }
    }
}

impl From<serde_yaml::Error> for ParseError {
    fn from(err: serde_yaml::Error) -> Self {
        let position = err
            .location()
            .map(|loc| Position::new(loc.line(), loc.column()));
        ParseError::Syntax {
            message: err.to_string(),
            position,
        }
    }
}

/// Parsed in-memory form of a document: a nested mapping/sequence/scalar
/// tree. Recomputed transiently per evaluation, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    root: Value,
}

/// Parses document text. Empty (or whitespace-only) text is a valid,
/// empty document.
pub fn parse(text: &str) -> ParseResult<ParsedDocument> {
    if text.trim().is_empty() {
        return Ok(ParsedDocument { root: Value::Null });
    }
    let root: Value = serde_yaml::from_str(text)?;
    Ok(ParsedDocument { root })
}

impl ParsedDocument {
    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_null()
    }

    /// Top-level value under the given key, if the root is a mapping.
    pub fn top_level(&self, key: &str) -> Option<&Value> {
        self.root.as_object()?.get(key)
    }

    /// Named component instances declared under the given kind's
    /// container. A missing or non-mapping container is just empty.
    pub fn components_of(&self, kind: ComponentKind) -> Vec<(&str, &Value)> {
        match self.top_level(kind.container()).and_then(Value::as_object) {
            Some(map) => map.iter().map(|(name, cfg)| (name.as_str(), cfg)).collect(),
            None => Vec::new(),
        }
    }

    /// Every declared component instance across all kinds.
    pub fn all_components(&self) -> Vec<(ComponentKind, &str, &Value)> {
        ComponentKind::ALL
            .into_iter()
            .flat_map(|kind| {
                self.components_of(kind)
                    .into_iter()
                    .map(move |(name, cfg)| (kind, name, cfg))
            })
            .collect()
    }

    /// Named pipeline definitions under the top-level `pipelines` mapping.
    pub fn pipelines(&self) -> Vec<(&str, &Value)> {
        match self.top_level("pipelines").and_then(Value::as_object) {
            Some(map) => map.iter().map(|(name, def)| (name.as_str(), def)).collect(),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_document() {
        let doc = parse("").unwrap();
        assert!(doc.is_empty());
        assert!(doc.all_components().is_empty());
        assert!(doc.pipelines().is_empty());

        let doc = parse("   \n\n").unwrap();
        assert!(doc.is_empty());
    }

    #[test]
    fn test_parse_components() {
        let doc = parse("receivers:\n  otlp:\n    endpoint: localhost:4317\nprocessors:\n  batch:\n    timeout: 10s\n").unwrap();
        let receivers = doc.components_of(ComponentKind::Receiver);
        assert_eq!(receivers.len(), 1);
        assert_eq!(receivers[0].0, "otlp");

        let all = doc.all_components();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_parse_pipelines() {
        let doc = parse("pipelines:\n  traces:\n    receivers: [otlp]\n    exporters: [debug]\n").unwrap();
        let pipelines = doc.pipelines();
        assert_eq!(pipelines.len(), 1);
        assert_eq!(pipelines[0].0, "traces");
    }

    #[test]
    fn test_parse_error_has_location() {
        let err = parse("receivers:\n  otlp: [unclosed\n").unwrap_err();
        assert!(err.to_string().contains("invalid document syntax"));
    }

    #[test]
    fn test_missing_sections_are_empty() {
        let doc = parse("receivers:\n  otlp: {}\n").unwrap();
        assert!(doc.components_of(ComponentKind::Exporter).is_empty());
        assert!(doc.pipelines().is_empty());
    }
}
