//! Tree-sitter parser integration for Python
//!
//! Parses whole files with the `tree-sitter-python` grammar and exposes the
//! small set of node helpers the member extractor relies on.

use crate::errors::{Result, SortError};
use std::path::Path;
use tree_sitter::{Language, Node, Parser, Tree};

fn python_language() -> Language {
    tree_sitter_python::LANGUAGE.into()
}

/// Parse Python source into a tree-sitter syntax tree.
///
/// Any `ERROR` or `MISSING` node in the tree is reported as a
/// [`SortError::Parse`] positioned at the first offending node, so callers
/// never see a partially recovered tree.
pub fn parse_python(source: &str, path: &Path) -> Result<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(&python_language())
        .map_err(|e| SortError::consistency(path, format!("failed to load Python grammar: {e}")))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| SortError::consistency(path, "parser returned no syntax tree"))?;

    if let Some(node) = first_error(tree.root_node()) {
        let position = node.start_position();
        return Err(SortError::parse(path, position.row + 1, position.column));
    }

    Ok(tree)
}

/// Find the first error or missing node in document order.
pub fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }

    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

/// Get text for a tree-sitter node
pub fn node_text<'a>(node: &Node<'_>, source: &'a str) -> &'a str {
    &source[node.start_byte()..node.end_byte()]
}

/// Last row covered by a node, ignoring a trailing position at column 0.
pub fn node_last_row(node: &Node<'_>) -> usize {
    let start = node.start_position();
    let end = node.end_position();
    if end.column == 0 && end.row > start.row {
        end.row - 1
    } else {
        end.row
    }
}

/// Collect the nearest `class_definition` nodes below `node`.
///
/// The search does not descend into a class once found: nested classes are
/// reached by calling this again on the returned class.
pub fn nearest_classes<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut classes = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "class_definition" {
            classes.push(child);
        } else {
            classes.extend(nearest_classes(child));
        }
    }
    classes
}

/// Statement nodes of a block, skipping comments and other extras.
pub fn block_statements<'t>(block: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = block.walk();
    block
        .named_children(&mut cursor)
        .filter(|child| !child.is_extra() && child.kind() != "comment")
        .collect()
}

/// Row of the `:` that ends a class header.
pub fn header_colon_row(class_node: &Node<'_>) -> Option<usize> {
    let mut cursor = class_node.walk();
    let colon = class_node
        .children(&mut cursor)
        .find(|child| child.kind() == ":");
    colon.map(|node| node.end_position().row)
}

/// Name a decorator refers to: the last segment of its callee.
///
/// `@api.depends("x")`, `@depends("x")` and `@api.depends` all yield
/// `depends`.
pub fn decorator_name(decorator: &Node<'_>, source: &str) -> Option<String> {
    let mut cursor = decorator.walk();
    let expr = decorator
        .named_children(&mut cursor)
        .find(|child| !child.is_extra() && child.kind() != "comment")?;
    callee_name(&expr, source)
}

fn callee_name(expr: &Node<'_>, source: &str) -> Option<String> {
    match expr.kind() {
        "identifier" => Some(node_text(expr, source).to_string()),
        "attribute" => expr
            .child_by_field_name("attribute")
            .map(|attr| node_text(&attr, source).to_string()),
        "call" => expr
            .child_by_field_name("function")
            .and_then(|function| callee_name(&function, source)),
        _ => None,
    }
}
