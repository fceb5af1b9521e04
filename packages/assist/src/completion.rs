//! Context-aware completion suggestions.
//!
//! The policy ladder follows the inferred cursor context:
//! top of the document → section names; inside a section → component
//! names from the registry catalog; inside a component → schema-driven
//! property and enum-value suggestions.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use flowconf_document::source::{indent_width, is_blank_or_comment, line_key};
use flowconf_document::{resolve_context, ComponentKind};
use flowconf_schema::{SchemaCache, SchemaNode};

use crate::navigate::resolve_node;

/// One ranked suggestion. `sort_text` orders the list: required
/// properties sort before optional ones, enum literals keep their
/// declaration order after both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionItem {
    pub label: String,
    pub insert_text: String,
    pub documentation: Option<String>,
    pub sort_text: String,
}

pub struct CompletionProvider {
    cache: Arc<SchemaCache>,
}

impl CompletionProvider {
    pub fn new(cache: Arc<SchemaCache>) -> Self {
        Self { cache }
    }

    /// Suggestions for the cursor line (0-based index), already ranked.
    ///
    /// The only suspension point is the on-demand schema/catalog fetch;
    /// everything else is a synchronous pass over the text.
    pub async fn complete(&self, text: &str, cursor_line: usize) -> Vec<CompletionItem> {
        let lines: Vec<&str> = text.lines().collect();
        let context = resolve_context(&lines, cursor_line);

        let mut items = match (context.section, &context.component) {
            (None, _) => {
                if context.depth == 0 {
                    section_items()
                } else {
                    // Nested under something that is not a component
                    // section (e.g. `pipelines`): nothing to offer.
                    Vec::new()
                }
            }
            (Some(section), None) => {
                if context.depth == 1 {
                    self.component_items(section, text).await
                } else {
                    // Oddly indented: too shallow a context to trust.
                    Vec::new()
                }
            }
            (Some(section), Some(component)) => {
                self.property_items(section, component, &context.path).await
            }
        };

        items.sort_by(|a, b| a.sort_text.cmp(&b.sort_text).then(a.label.cmp(&b.label)));
        items
    }

    /// Component names known for a section. Primary source is the
    /// registry catalog; when that is unavailable the names already
    /// declared under the section keep the feature alive.
    async fn component_items(&self, section: ComponentKind, text: &str) -> Vec<CompletionItem> {
        let mut names: Vec<String> = match self.cache.catalog().await {
            Some(refs) => refs
                .iter()
                .filter(|r| r.kind == section)
                .map(|r| r.name.clone())
                .collect(),
            None => {
                debug!(%section, "catalog unavailable, falling back to declared names");
                declared_components(text, section)
            }
        };
        names.sort();
        names.dedup();

        names
            .into_iter()
            .map(|name| CompletionItem {
                label: name.clone(),
                insert_text: format!("{name}:\n  "),
                documentation: Some(format!("{section} '{name}'")),
                sort_text: name,
            })
            .collect()
    }

    /// Schema-driven property (and enum value) suggestions. No schema →
    /// no suggestions, never a guess.
    async fn property_items(
        &self,
        section: ComponentKind,
        component: &str,
        path: &[String],
    ) -> Vec<CompletionItem> {
        let Some(schema) = self.cache.schema(section, component).await else {
            return Vec::new();
        };
        let Some(node) = resolve_node(&schema, path) else {
            debug!(%section, component, ?path, "path does not resolve in schema");
            return Vec::new();
        };

        let mut items = Vec::new();
        for (key, child) in node.visible_properties() {
            let group = if node.is_required(key) { '0' } else { '1' };
            items.push(CompletionItem {
                label: key.to_string(),
                insert_text: insert_text_for(key, child),
                documentation: child.description.clone(),
                sort_text: format!("{group}_{key}"),
            });
        }

        // Value-position suggestions when the resolved node itself is an
        // enum, in declaration order.
        for (index, literal) in node.enum_values.iter().enumerate() {
            let text = scalar_text(literal);
            items.push(CompletionItem {
                label: text.clone(),
                insert_text: text,
                documentation: None,
                sort_text: format!("2_{index:03}"),
            });
        }

        items
    }
}

/// Depth-0 suggestions: the fixed top-level containers in canonical
/// order.
fn section_items() -> Vec<CompletionItem> {
    ComponentKind::ALL
        .into_iter()
        .enumerate()
        .map(|(index, kind)| {
            let container = kind.container();
            CompletionItem {
                label: container.to_string(),
                insert_text: format!("{container}:\n  "),
                documentation: Some(format!("All {kind} components in this document")),
                sort_text: format!("{index:02}"),
            }
        })
        .collect()
}

/// Insert text driven by the property's declared type.
fn insert_text_for(key: &str, node: &SchemaNode) -> String {
    if let Some(first) = node.enum_values.first() {
        return format!("{key}: {}", scalar_text(first));
    }
    match node.value_type.as_deref() {
        Some("object") => format!("{key}:\n  "),
        Some("array") => format!("{key}:\n  - "),
        Some("boolean") => format!("{key}: false"),
        Some("number") | Some("integer") => format!("{key}: 0"),
        Some("string") => format!("{key}: \"\""),
        _ => format!("{key}: "),
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Component names declared under a section, read straight off the
/// text with the same indentation heuristic the context resolver uses.
fn declared_components(text: &str, section: ComponentKind) -> Vec<String> {
    let mut names = Vec::new();
    let mut in_section = false;

    for line in text.lines() {
        if is_blank_or_comment(line) {
            continue;
        }
        if indent_width(line) == 0 {
            in_section = line_key(line) == Some(section.container());
            continue;
        }
        if in_section && indent_width(line) == 2 {
            if let Some(key) = line_key(line) {
                names.push(key.to_string());
            }
        }
    }

    names
}
