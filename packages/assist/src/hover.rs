//! Inline documentation for the property under the cursor.

use std::sync::Arc;

use serde_json::Value;

use flowconf_document::resolve_context;
use flowconf_document::source::indent_width;
use flowconf_schema::{SchemaCache, SchemaNode};

use crate::navigate::resolve_node;

/// Rendered documentation, keyed by the property-name token's range so
/// the editor can attach it. Line and columns are 0-based; the end
/// column is exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hover {
    pub contents: String,
    pub line: usize,
    pub start_column: usize,
    pub end_column: usize,
}

pub struct HoverProvider {
    cache: Arc<SchemaCache>,
}

impl HoverProvider {
    pub fn new(cache: Arc<SchemaCache>) -> Self {
        Self { cache }
    }

    /// Documentation for the cursor position (0-based line and column).
    ///
    /// Answers `None` unless the cursor sits on a property-name token
    /// that resolves to a known schema node: no section/component in
    /// context, no schema, or a cursor over the value part all yield
    /// nothing.
    pub async fn hover(&self, text: &str, line: usize, column: usize) -> Option<Hover> {
        let lines: Vec<&str> = text.lines().collect();
        let current = *lines.get(line)?;

        let start = indent_width(current);
        let key = current[start..].split_once(':')?.0.trim_end();
        if key.is_empty() || key.starts_with('#') || key.starts_with('-') {
            return None;
        }
        // The token itself, not its value.
        if column < start || column >= start + key.len() {
            return None;
        }

        let context = resolve_context(&lines, line);
        let section = context.section?;
        let component = context.component.as_deref()?;

        let schema = self.cache.schema(section, component).await?;
        let parent = resolve_node(&schema, &context.path)?;
        let bare = key.trim_matches('"').trim_matches('\'');
        let node = parent.property(bare)?;

        Some(Hover {
            contents: format_documentation(bare, parent.is_required(bare), node),
            line,
            start_column: start,
            end_column: start + key.len(),
        })
    }
}

fn format_documentation(key: &str, required: bool, node: &SchemaNode) -> String {
    let mut out = format!("**{key}**");
    out.push_str(if required { " (required)" } else { " (optional)" });
    if let Some(value_type) = &node.value_type {
        out.push_str(&format!(": {value_type}"));
    }

    if let Some(description) = &node.description {
        out.push_str("\n\n");
        out.push_str(description);
    }
    if let Some(default) = &node.default {
        out.push_str(&format!("\n\nDefault: `{}`", scalar_text(default)));
    }
    if !node.enum_values.is_empty() {
        let values: Vec<String> = node.enum_values.iter().map(scalar_text).collect();
        out.push_str(&format!("\n\nAllowed values: {}", values.join(", ")));
    }
    if let Some(pattern) = &node.pattern {
        out.push_str(&format!("\n\nPattern: `{pattern}`"));
    }

    let mut constraints = Vec::new();
    if let Some(minimum) = node.minimum {
        constraints.push(format!("minimum {minimum}"));
    }
    if let Some(maximum) = node.maximum {
        constraints.push(format!("maximum {maximum}"));
    }
    if let Some(min_length) = node.min_length {
        constraints.push(format!("min length {min_length}"));
    }
    if let Some(max_length) = node.max_length {
        constraints.push(format!("max length {max_length}"));
    }
    if !constraints.is_empty() {
        out.push_str(&format!("\n\nConstraints: {}", constraints.join(", ")));
    }

    out
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
