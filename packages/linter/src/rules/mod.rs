mod pipeline_endpoints;
mod undeclared_reference;

pub use pipeline_endpoints::PipelineEndpointsRule;
pub use undeclared_reference::UndeclaredReferenceRule;

use crate::diagnostic::Diagnostic;
use flowconf_document::ParsedDocument;

/// Trait for implementing structural rules
pub trait StructuralRule: Send + Sync {
    /// Unique identifier for this rule
    fn name(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// Check one parsed document. Rules are independent and
    /// side-effect-free; a missing optional section means nothing to
    /// validate, not an error.
    fn check(&self, text: &str, document: &ParsedDocument) -> Vec<Diagnostic>;
}

/// Registry of all available structural rules
pub struct RuleRegistry {
    rules: Vec<Box<dyn StructuralRule>>,
}

impl RuleRegistry {
    /// Create a new registry with all built-in rules
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(PipelineEndpointsRule),
                Box::new(UndeclaredReferenceRule),
            ],
        }
    }

    /// Get all registered rules
    pub fn rules(&self) -> &[Box<dyn StructuralRule>] {
        &self.rules
    }

    /// Create an empty registry
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Add a custom rule to the registry
    pub fn add_rule(&mut self, rule: Box<dyn StructuralRule>) {
        self.rules.push(rule);
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &format!("{} rules", self.rules.len()))
            .finish()
    }
}
