//! Debounced, cancellable validation runs.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use flowconf_document::{find_position, parse, ComponentKind, ParsedDocument, Position};
use flowconf_linter::{run_rules, Diagnostic, RuleRegistry};
use flowconf_schema::SchemaCache;

use crate::fields::extract_field;
use crate::remote::RemoteValidator;
use crate::sink::DiagnosticsSink;

const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Terminal state of one validation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// All stages ran; the merged result was produced.
    Complete,
    /// The text did not parse: one diagnostic, schema stage skipped.
    ParseFailed,
    /// A newer run started; this run's results were discarded.
    Superseded,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationOutcome {
    pub status: RunStatus,
    pub diagnostics: Vec<Diagnostic>,
}

/// Orchestrates the edit-triggered validation cycle.
///
/// One logical pipeline with debounced re-entry: every text change
/// supersedes the previous run via a monotonically increasing
/// generation, checked after the debounce window and again immediately
/// before publishing. Superseded runs no-op even if their remote calls
/// complete later: last writer wins by start order, not completion
/// order.
#[derive(Clone)]
pub struct ValidationPipeline {
    schemas: Arc<SchemaCache>,
    remote: Arc<dyn RemoteValidator>,
    sink: Arc<dyn DiagnosticsSink>,
    rules: Arc<RuleRegistry>,
    debounce: Duration,
    generation: Arc<AtomicU64>,
}

impl ValidationPipeline {
    pub fn new(
        schemas: Arc<SchemaCache>,
        remote: Arc<dyn RemoteValidator>,
        sink: Arc<dyn DiagnosticsSink>,
    ) -> Self {
        Self {
            schemas,
            remote,
            sink,
            rules: Arc::new(RuleRegistry::new()),
            debounce: DEFAULT_DEBOUNCE,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_rules(mut self, rules: RuleRegistry) -> Self {
        self.rules = Arc::new(rules);
        self
    }

    /// Entry point for every text change.
    ///
    /// Bumps the run generation (cancelling older runs at their next
    /// checkpoint), waits out the debounce window, then validates and
    /// publishes the full replacement diagnostic list, unless a newer
    /// edit superseded this run meanwhile.
    pub fn notify_change(&self, text: String) -> JoinHandle<RunStatus> {
        let run = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let pipeline = self.clone();

        tokio::spawn(async move {
            tokio::time::sleep(pipeline.debounce).await;
            if pipeline.generation.load(Ordering::SeqCst) != run {
                debug!(run, "superseded during debounce");
                return RunStatus::Superseded;
            }

            let outcome = pipeline.run_validation(&text).await;

            if pipeline.generation.load(Ordering::SeqCst) != run {
                debug!(run, "superseded before publish");
                return RunStatus::Superseded;
            }
            pipeline.sink.publish(outcome.diagnostics);
            outcome.status
        })
    }

    /// The un-debounced core: parse → structural rules → per-component
    /// schema validation → merge. Publishing is the caller's business.
    pub async fn run_validation(&self, text: &str) -> ValidationOutcome {
        let document = match parse(text) {
            Ok(document) => document,
            Err(error) => {
                debug!(%error, "parse failed, skipping validators");
                let anchor = error.position().unwrap_or_else(Position::document_start);
                return ValidationOutcome {
                    status: RunStatus::ParseFailed,
                    diagnostics: vec![Diagnostic::error(error.to_string(), anchor)],
                };
            }
        };

        let structural = run_rules(text, &document, &self.rules);
        let schema = self.validate_components(text, &document).await;

        ValidationOutcome {
            status: RunStatus::Complete,
            diagnostics: merge(structural, schema),
        }
    }

    /// Concurrent fan-out: one remote validation per declared component
    /// instance, joined with per-component failure tolerance.
    async fn validate_components(&self, text: &str, document: &ParsedDocument) -> Vec<Diagnostic> {
        let components = document.all_components();
        if components.is_empty() {
            return Vec::new();
        }

        let checks = components
            .into_iter()
            .map(|(kind, name, config)| self.validate_component(text, kind, name, config));

        join_all(checks).await.into_iter().flatten().collect()
    }

    async fn validate_component(
        &self,
        text: &str,
        kind: ComponentKind,
        name: &str,
        config: &Value,
    ) -> Vec<Diagnostic> {
        let verdict = match self.remote.validate(kind, name, config).await {
            Ok(verdict) => verdict,
            Err(error) => {
                warn!(%kind, name, %error, "remote validation failed, skipping component");
                return Vec::new();
            }
        };

        if verdict.valid {
            return self.unknown_key_diagnostics(text, kind, name, config).await;
        }

        verdict
            .errors
            .iter()
            .map(|message| self.message_diagnostic(text, kind, name, message))
            .collect()
    }

    /// The remote validator accepted the config; cross-check the
    /// declared keys against the schema's known key set (combinator
    /// branches included) and flag the rest.
    async fn unknown_key_diagnostics(
        &self,
        text: &str,
        kind: ComponentKind,
        name: &str,
        config: &Value,
    ) -> Vec<Diagnostic> {
        let Some(declared) = config.as_object() else {
            return Vec::new();
        };
        let Some(schema) = self.schemas.schema(kind, name).await else {
            return Vec::new();
        };
        let known = schema.known_keys();

        declared
            .keys()
            .filter(|key| !known.contains(key.as_str()))
            .map(|key| {
                let path = vec![kind.container().to_string(), name.to_string(), key.clone()];
                let anchor = find_position(text, &path)
                    .or_else(|| find_position(text, &path[..2]))
                    .unwrap_or_else(Position::document_start);
                Diagnostic::error(format!("unknown key '{key}' in {kind} '{name}'"), anchor)
                    .with_path(path)
            })
            .collect()
    }

    /// One diagnostic per remote message, anchored as precisely as the
    /// message allows: extracted field position → component declaration
    /// → document start.
    fn message_diagnostic(
        &self,
        text: &str,
        kind: ComponentKind,
        name: &str,
        message: &str,
    ) -> Diagnostic {
        let component = vec![kind.container().to_string(), name.to_string()];

        if let Some(field) = extract_field(message) {
            let mut path = component.clone();
            path.push(field);
            let anchor = find_position(text, &path)
                .or_else(|| find_position(text, &component))
                .unwrap_or_else(Position::document_start);
            return Diagnostic::error(message, anchor).with_path(path);
        }

        let anchor = find_position(text, &component).unwrap_or_else(Position::document_start);
        Diagnostic::error(message, anchor).with_path(component)
    }
}

/// Merge structural and schema findings; identical findings reported by
/// multiple sources collapse to one (first insertion wins).
fn merge(structural: Vec<Diagnostic>, schema: Vec<Diagnostic>) -> Vec<Diagnostic> {
    let mut seen = HashSet::new();
    let mut merged = Vec::new();

    for diagnostic in structural.into_iter().chain(schema) {
        if seen.insert(diagnostic.dedup_key()) {
            merged.push(diagnostic);
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowconf_linter::Severity;

    #[test]
    fn test_merge_collapses_identical_findings() {
        let a = Diagnostic::warning("pipeline 'traces' has no receivers", Position::new(2, 3));
        let b = a.clone();
        let merged = merge(vec![a], vec![b]);
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn test_merge_keeps_differing_severity() {
        let warn = Diagnostic::warning("same text", Position::new(1, 1));
        let err = Diagnostic::error("same text", Position::new(1, 1));
        let merged = merge(vec![warn], vec![err]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].severity, Severity::Warning);
    }
}
