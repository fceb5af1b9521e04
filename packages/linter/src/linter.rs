use crate::diagnostic::Diagnostic;
use crate::rules::RuleRegistry;
use flowconf_document::ParsedDocument;

/// Run every registered structural rule over one parsed document and
/// concatenate the results. Rules are synchronous and independent; the
/// order of findings follows registry order.
pub fn run_rules(text: &str, document: &ParsedDocument, registry: &RuleRegistry) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for rule in registry.rules() {
        diagnostics.extend(rule.check(text, document));
    }

    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowconf_document::parse;

    #[test]
    fn test_runs_all_builtin_rules() {
        let text = "pipelines:\n  traces:\n    receivers: [ghost]\n";
        let document = parse(text).unwrap();
        let diagnostics = run_rules(text, &document, &RuleRegistry::new());

        // pipeline-endpoints: no exporters; undeclared-reference: ghost.
        assert_eq!(diagnostics.len(), 2);
    }

    #[test]
    fn test_empty_registry() {
        let text = "pipelines:\n  traces: {}\n";
        let document = parse(text).unwrap();
        assert!(run_rules(text, &document, &RuleRegistry::empty()).is_empty());
    }

    #[test]
    fn test_empty_document_is_clean() {
        let document = parse("").unwrap();
        assert!(run_rules("", &document, &RuleRegistry::new()).is_empty());
    }
}
