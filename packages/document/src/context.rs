//! Cursor context inference over raw document text.
//!
//! A backward indentation scan, not a parse: it keeps working while the
//! document is mid-keystroke and syntactically broken. Worst case it
//! returns a context that is too shallow and completions degrade,
//! it never fails.

use crate::kind::ComponentKind;
use crate::source::{indent_width, line_key};

/// Logical position of the cursor inside the document.
///
/// `component` is only set when `section` is, and `path` is only
/// populated once `component` is. A cursor sitting on a `key:` line is
/// never "within" that key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CursorContext {
    pub section: Option<ComponentKind>,
    pub component: Option<String>,
    pub path: Vec<String>,
    pub depth: usize,
}

/// Indent step between a section and its component declarations.
const COMPONENT_INDENT: usize = 2;

/// Infers the context for the cursor line.
///
/// Walks backward collecting `(indent, key)` ancestors: a line counts as
/// an ancestor when its indentation is strictly smaller than the closest
/// ancestor seen so far. Blank, comment and colon-less lines are
/// skipped. The walk stops at indentation zero; if that root line is one
/// of the fixed container names it becomes the section, the ancestor at
/// the component indent becomes the component, everything deeper is the
/// nested property path.
pub fn resolve_context(lines: &[&str], cursor_line: usize) -> CursorContext {
    let Some(line) = lines.get(cursor_line) else {
        return CursorContext::default();
    };
    let cursor_indent = indent_width(line);

    let mut ancestors: Vec<(usize, String)> = Vec::new();
    let mut closest = cursor_indent;
    for line in lines[..cursor_line].iter().rev() {
        let indent = indent_width(line);
        if indent >= closest {
            continue;
        }
        let Some(key) = line_key(line) else {
            continue;
        };
        ancestors.push((indent, key.to_string()));
        closest = indent;
        if indent == 0 {
            break;
        }
    }
    ancestors.reverse();

    let mut context = CursorContext {
        depth: cursor_indent / COMPONENT_INDENT,
        ..Default::default()
    };

    let mut chain = ancestors.into_iter();
    match chain.next() {
        Some((0, root_key)) => match ComponentKind::from_container(&root_key) {
            Some(section) => context.section = Some(section),
            None => return context,
        },
        _ => return context,
    }

    if let Some((indent, key)) = chain.next() {
        if indent == COMPONENT_INDENT {
            context.component = Some(key);
            context.path = chain.map(|(_, key)| key).collect();
        }
    }

    context
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(text: &str, cursor_line: usize) -> CursorContext {
        let lines: Vec<&str> = text.lines().collect();
        resolve_context(&lines, cursor_line)
    }

    #[test]
    fn test_empty_document() {
        let context = resolve("", 0);
        assert_eq!(context, CursorContext::default());
    }

    #[test]
    fn test_cursor_on_property_line() {
        let text = "processors:\n  batch:\n    timeout: 10s";
        let context = resolve(text, 2);
        assert_eq!(context.section, Some(ComponentKind::Processor));
        assert_eq!(context.component.as_deref(), Some("batch"));
        assert!(context.path.is_empty());
        assert_eq!(context.depth, 2);
    }

    #[test]
    fn test_zero_indent_cursor_has_no_section() {
        let text = "receivers:\n  otlp:\n    endpoint: x\nexporters:";
        for line in [0, 3] {
            let context = resolve(text, line);
            assert_eq!(context.section, None);
            assert_eq!(context.component, None);
        }
    }

    #[test]
    fn test_cursor_on_component_line() {
        // The component's own declaration line is not "within" it.
        let text = "receivers:\n  otlp:";
        let context = resolve(text, 1);
        assert_eq!(context.section, Some(ComponentKind::Receiver));
        assert_eq!(context.component, None);
        assert!(context.path.is_empty());
        assert_eq!(context.depth, 1);
    }

    #[test]
    fn test_nested_path() {
        let text = "receivers:\n  otlp:\n    protocols:\n      grpc:\n        endpoint: x";
        let context = resolve(text, 4);
        assert_eq!(context.section, Some(ComponentKind::Receiver));
        assert_eq!(context.component.as_deref(), Some("otlp"));
        assert_eq!(context.path, vec!["protocols".to_string(), "grpc".to_string()]);
        assert_eq!(context.depth, 4);
    }

    #[test]
    fn test_unknown_top_level_key() {
        let text = "pipelines:\n  traces:\n    receivers: [otlp]";
        let context = resolve(text, 2);
        assert_eq!(context.section, None);
        assert_eq!(context.component, None);
        assert!(context.path.is_empty());
        assert_eq!(context.depth, 2);
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let text = "receivers:\n just words no colon\n  otlp:\n    # a comment\n\n    endpoint: x";
        let context = resolve(text, 5);
        assert_eq!(context.section, Some(ComponentKind::Receiver));
        assert_eq!(context.component.as_deref(), Some("otlp"));
        assert!(context.path.is_empty());
    }

    #[test]
    fn test_cursor_past_end_of_file() {
        let context = resolve("receivers:", 5);
        assert_eq!(context, CursorContext::default());
    }
}
