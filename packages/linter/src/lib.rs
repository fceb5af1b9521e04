mod diagnostic;
mod linter;
mod rules;

pub use diagnostic::{Diagnostic, Severity};
pub use linter::run_rules;
pub use rules::{PipelineEndpointsRule, RuleRegistry, StructuralRule, UndeclaredReferenceRule};
