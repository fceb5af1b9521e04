use flowconf_linter::Diagnostic;

/// External "set diagnostics" collaborator (the editor surface).
///
/// Receives the complete list on every completed run: a full
/// replacement, never an incremental patch.
pub trait DiagnosticsSink: Send + Sync {
    fn publish(&self, diagnostics: Vec<Diagnostic>);
}
