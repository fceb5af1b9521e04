use std::collections::HashSet;

use flowconf_document::{find_position, ComponentKind, ParsedDocument, Position};

use crate::diagnostic::Diagnostic;
use crate::rules::pipeline_endpoints::referenced;
use crate::rules::StructuralRule;

/// Structural rule: a pipeline may only reference component names that
/// are declared in the matching section.
pub struct UndeclaredReferenceRule;

/// Pipeline reference keys and the section each draws from.
const REFERENCE_KEYS: [(&str, ComponentKind); 3] = [
    ("receivers", ComponentKind::Receiver),
    ("processors", ComponentKind::Processor),
    ("exporters", ComponentKind::Exporter),
];

impl StructuralRule for UndeclaredReferenceRule {
    fn name(&self) -> &'static str {
        "undeclared-reference"
    }

    fn description(&self) -> &'static str {
        "Pipelines may only reference declared components"
    }

    fn check(&self, text: &str, document: &ParsedDocument) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for (pipeline, definition) in document.pipelines() {
            for (key, kind) in REFERENCE_KEYS {
                let declared: HashSet<&str> = document
                    .components_of(kind)
                    .into_iter()
                    .map(|(name, _)| name)
                    .collect();

                for name in referenced(definition, key) {
                    if declared.contains(name) {
                        continue;
                    }
                    let path = vec![
                        "pipelines".to_string(),
                        pipeline.to_string(),
                        key.to_string(),
                    ];
                    let anchor = find_position(text, &path)
                        .or_else(|| find_position(text, &path[..2]))
                        .unwrap_or_else(Position::document_start);
                    diagnostics.push(
                        Diagnostic::error(
                            format!(
                                "pipeline '{pipeline}' references undeclared {kind} '{name}'"
                            ),
                            anchor,
                        )
                        .with_path(path),
                    );
                }
            }
        }

        diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowconf_document::parse;

    fn check(text: &str) -> Vec<Diagnostic> {
        UndeclaredReferenceRule.check(text, &parse(text).unwrap())
    }

    #[test]
    fn test_declared_references_are_clean() {
        let text = "receivers:\n  otlp: {}\nexporters:\n  debug: {}\npipelines:\n  traces:\n    receivers: [otlp]\n    exporters: [debug]\n";
        assert!(check(text).is_empty());
    }

    #[test]
    fn test_undeclared_reference() {
        let text = "exporters:\n  debug: {}\npipelines:\n  traces:\n    receivers: [otlp]\n    exporters: [debug]\n";
        let diagnostics = check(text);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0]
            .message
            .contains("references undeclared receiver 'otlp'"));
        // Anchored at the `receivers:` list inside the pipeline.
        assert_eq!(diagnostics[0].line, 5);
    }

    #[test]
    fn test_tolerates_odd_shapes() {
        // Scalar where a list is expected: nothing to resolve, no panic.
        let text = "pipelines:\n  traces:\n    receivers: otlp\n";
        assert!(check(text).is_empty());
    }
}
