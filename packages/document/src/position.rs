//! Best-effort recovery of source positions for key paths.
//!
//! Diagnostics produced from the parsed tree (or from a remote
//! validator with no position information at all) only know a chain of
//! keys. This module maps that chain back onto the raw text with an
//! ordered strategy chain, first success wins:
//!
//! 1. exact walk of indentation-delimited blocks matching the chain
//! 2. textual scan for `key:` inside the deepest block the walk reached
//!
//! A miss returns `None`; callers fall back to a coarser anchor rather
//! than dropping the diagnostic.

use crate::source::{indent_width, is_blank_or_comment, line_key, Position};

/// Locates the line/column of the key addressed by `path`.
///
/// Pure over `(text, path)`: calling it twice on unchanged input returns
/// the same answer. Never panics.
pub fn find_position(text: &str, path: &[String]) -> Option<Position> {
    if path.is_empty() {
        return None;
    }
    let lines: Vec<&str> = text.lines().collect();
    let matched = locate_chain(&lines, path);
    if matched.len() == path.len() {
        let (index, _) = matched[matched.len() - 1];
        return Some(key_position(&lines, index));
    }
    scan_within_ancestor(&lines, &matched, path)
}

fn key_position(lines: &[&str], index: usize) -> Position {
    Position::new(index + 1, indent_width(lines[index]) + 1)
}

/// Walks the key chain through nested indentation blocks, matching each
/// segment at its block's own child indent. Returns the matched
/// `(line index, indent)` per segment, stopping at the first miss.
fn locate_chain(lines: &[&str], path: &[String]) -> Vec<(usize, usize)> {
    let mut matched = Vec::new();
    let mut start = 0;
    let mut end = lines.len();
    let mut parent_indent: Option<usize> = None;

    for segment in path {
        let mut found = None;
        let mut child_indent: Option<usize> = None;

        for (index, line) in lines.iter().enumerate().take(end).skip(start) {
            if is_blank_or_comment(line) {
                continue;
            }
            let indent = indent_width(line);
            if let Some(parent) = parent_indent {
                if indent <= parent {
                    break;
                }
            }
            // The first line of a block fixes its child indent; deeper
            // lines belong to nested blocks.
            let expected = *child_indent.get_or_insert(indent);
            if indent != expected {
                continue;
            }
            if line_key(line) == Some(segment.as_str()) {
                found = Some((index, indent));
                break;
            }
        }

        let Some((index, indent)) = found else {
            break;
        };
        matched.push((index, indent));
        parent_indent = Some(indent);
        start = index + 1;
        end = block_end(lines, index, indent);
    }

    matched
}

/// Exclusive end of the block opened at `decl` (the next line at or
/// below its indentation).
fn block_end(lines: &[&str], decl: usize, indent: usize) -> usize {
    for (index, line) in lines.iter().enumerate().skip(decl + 1) {
        if is_blank_or_comment(line) {
            continue;
        }
        if indent_width(line) <= indent {
            return index;
        }
    }
    lines.len()
}

/// Fallback: linear scan for the leaf key inside the nearest matched
/// ancestor's block, stopping at the block boundary.
fn scan_within_ancestor(
    lines: &[&str],
    matched: &[(usize, usize)],
    path: &[String],
) -> Option<Position> {
    let &(decl, indent) = matched.last()?;
    let needle = format!("{}:", path.last()?);

    for (index, line) in lines.iter().enumerate().skip(decl + 1) {
        if is_blank_or_comment(line) {
            continue;
        }
        if indent_width(line) <= indent {
            break;
        }
        if let Some(column) = line.find(&needle) {
            return Some(Position::new(index + 1, column + 1));
        }
    }
    None
}
