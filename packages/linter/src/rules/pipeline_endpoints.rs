use serde_json::Value;

use flowconf_document::{find_position, ParsedDocument, Position};

use crate::diagnostic::Diagnostic;
use crate::rules::StructuralRule;

/// Structural rule: a pipeline that declares no receivers cannot be fed
/// and one that declares no exporters drains nowhere; both get a
/// warning anchored at the pipeline's declaration.
pub struct PipelineEndpointsRule;

impl StructuralRule for PipelineEndpointsRule {
    fn name(&self) -> &'static str {
        "pipeline-endpoints"
    }

    fn description(&self) -> &'static str {
        "Every pipeline must reference at least one receiver and one exporter"
    }

    fn check(&self, text: &str, document: &ParsedDocument) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for (name, definition) in document.pipelines() {
            let path = vec!["pipelines".to_string(), name.to_string()];
            let anchor = find_position(text, &path).unwrap_or_else(Position::document_start);

            if referenced(definition, "receivers").is_empty() {
                diagnostics.push(
                    Diagnostic::warning(format!("pipeline '{name}' has no receivers"), anchor)
                        .with_path(path.clone()),
                );
            }
            if referenced(definition, "exporters").is_empty() {
                diagnostics.push(
                    Diagnostic::warning(format!("pipeline '{name}' has no exporters"), anchor)
                        .with_path(path.clone()),
                );
            }
        }

        diagnostics
    }
}

/// Component names a pipeline references under `key`. Non-sequence or
/// missing entries read as empty, never as an error.
pub(crate) fn referenced<'a>(definition: &'a Value, key: &str) -> Vec<&'a str> {
    definition
        .get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowconf_document::parse;

    fn check(text: &str) -> Vec<Diagnostic> {
        PipelineEndpointsRule.check(text, &parse(text).unwrap())
    }

    #[test]
    fn test_complete_pipeline_is_clean() {
        let text = "pipelines:\n  traces:\n    receivers: [otlp]\n    exporters: [debug]\n";
        assert!(check(text).is_empty());
    }

    #[test]
    fn test_missing_receivers_and_exporters() {
        let text = "pipelines:\n  traces:\n    processors: [batch]\n";
        let diagnostics = check(text);
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics[0].message.contains("no receivers"));
        assert!(diagnostics[1].message.contains("no exporters"));
        // Anchored at the `traces:` declaration line.
        assert_eq!(diagnostics[0].line, 2);
        assert_eq!(diagnostics[0].column, 3);
    }

    #[test]
    fn test_empty_reference_list() {
        let text = "pipelines:\n  metrics:\n    receivers: []\n    exporters: [debug]\n";
        let diagnostics = check(text);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("no receivers"));
    }

    #[test]
    fn test_no_pipelines_section() {
        assert!(check("receivers:\n  otlp: {}\n").is_empty());
        assert!(check("").is_empty());
    }
}
