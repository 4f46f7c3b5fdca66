//! Member extraction from a parsed class body.
//!
//! Spans are computed on whole lines. Each member owns:
//!
//! - the comment lines directly above its statement (no blank line between),
//! - its decorators and statement,
//! - everything after the statement up to the next member's leading comment,
//!   minus trailing blank lines.
//!
//! Trailing blank lines are recorded as the next member's `gap` so the
//! rewriter can replace them with conventional separators.

use super::member::{ClassBlock, Member, MemberShape};
use super::text::{self, LineIndex};
use crate::parser::{
    block_statements, decorator_name, header_colon_row, node_last_row, node_text,
};
use tree_sitter::Node;

/// Statements sharing source lines (`x = 1; y = 2`) move as one member.
#[derive(Debug)]
struct StatementGroup<'t> {
    node: Node<'t>,
    first_row: usize,
    last_row: usize,
}

/// Extract the reorderable members of a class definition.
///
/// Returns `None` for classes that have nothing to reorder: inline bodies
/// (`class A: pass`) and bodies with fewer than two movable members.
pub fn extract_class(class_node: Node<'_>, source: &str, lines: &LineIndex) -> Option<ClassBlock> {
    let name = class_node
        .child_by_field_name("name")
        .map(|n| node_text(&n, source).to_string())
        .unwrap_or_default();
    let body = class_node.child_by_field_name("body")?;
    let colon_row = header_colon_row(&class_node)?;

    let statements = block_statements(body);
    let first = statements.first()?;
    if first.start_position().row <= colon_row {
        return None;
    }

    let body_indent = text::indent_width(lines.line(source, first.start_position().row));
    let mut groups = group_statements(&statements, source, lines, body_indent);
    let mut floor = colon_row + 1;
    if groups.first().is_some_and(|g| is_docstring(&g.node)) {
        floor = groups[0].last_row + 1;
        groups.remove(0);
    }
    if groups.len() < 2 {
        return None;
    }

    let leads: Vec<usize> = groups
        .iter()
        .enumerate()
        .map(|(i, group)| {
            let floor = if i == 0 { floor } else { groups[i - 1].last_row + 1 };
            leading_comment_row(source, lines, group.first_row, floor, body_indent)
        })
        .collect();

    let mut members: Vec<Member> = Vec::with_capacity(groups.len());
    for (i, group) in groups.iter().enumerate() {
        let end_row = match leads.get(i + 1) {
            Some(&next_lead) => trim_blank_rows(source, lines, group.last_row + 1, next_lead),
            None => trailing_comment_end(source, lines, group.last_row, body_indent),
        };
        let span = lines.line_start(leads[i])..lines.line_start(end_row);
        let mut member = Member::new(shape_of(group.node, source), span, i);
        if let Some(previous) = members.last() {
            member.gap = previous.span.end..member.span.start;
        }
        members.push(member);
    }

    let region = members[0].span.start..members[members.len() - 1].span.end;
    Some(ClassBlock {
        name,
        region,
        members,
        newline: text::detect_newline(source),
    })
}

fn group_statements<'t>(
    statements: &[Node<'t>],
    source: &str,
    lines: &LineIndex,
    body_indent: usize,
) -> Vec<StatementGroup<'t>> {
    let mut groups: Vec<StatementGroup<'t>> = Vec::new();
    for statement in statements {
        let first_row = statement.start_position().row;
        let last_row = code_last_row(source, lines, first_row, node_last_row(statement), body_indent);
        match groups.last_mut() {
            Some(previous) if first_row <= previous.last_row => {
                previous.last_row = previous.last_row.max(last_row);
            }
            _ => groups.push(StatementGroup {
                node: *statement,
                first_row,
                last_row,
            }),
        }
    }
    groups
}

/// Last row of a statement that is not a body-level comment or blank line.
///
/// The grammar may fold comments that follow a nested block into that block;
/// those belong to the class body, not to the statement.
fn code_last_row(
    source: &str,
    lines: &LineIndex,
    first_row: usize,
    last_row: usize,
    body_indent: usize,
) -> usize {
    let mut row = last_row;
    while row > first_row {
        let line = lines.line(source, row);
        let body_level_comment =
            text::is_comment(line) && text::indent_width(line) <= body_indent;
        if !(text::is_blank(line) || body_level_comment) {
            break;
        }
        row -= 1;
    }
    row
}

/// First row of the comment block directly above `row`, never above `floor`.
///
/// Comments indented deeper than the body belong to the previous statement.
fn leading_comment_row(
    source: &str,
    lines: &LineIndex,
    row: usize,
    floor: usize,
    body_indent: usize,
) -> usize {
    let mut lead = row;
    while lead > floor {
        let line = lines.line(source, lead - 1);
        if !text::is_comment(line) || text::indent_width(line) > body_indent {
            break;
        }
        lead -= 1;
    }
    lead
}

/// Drop blank rows from the end of `[min_row, end_row)`.
fn trim_blank_rows(source: &str, lines: &LineIndex, min_row: usize, end_row: usize) -> usize {
    let mut end = end_row;
    while end > min_row && text::is_blank(lines.line(source, end - 1)) {
        end -= 1;
    }
    end
}

/// Row after the last comment that still belongs to the class body.
fn trailing_comment_end(source: &str, lines: &LineIndex, last_row: usize, indent: usize) -> usize {
    let mut row = last_row + 1;
    let mut end = row;
    while row < lines.line_count() {
        let line = lines.line(source, row);
        if text::is_blank(line) {
            row += 1;
        } else if text::is_comment(line) && text::indent_width(line) >= indent {
            row += 1;
            end = row;
        } else {
            break;
        }
    }
    end
}

fn is_docstring(node: &Node<'_>) -> bool {
    if node.kind() != "expression_statement" {
        return false;
    }
    first_named_child(node)
        .is_some_and(|child| matches!(child.kind(), "string" | "concatenated_string"))
}

fn first_named_child<'t>(node: &Node<'t>) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let child = node
        .named_children(&mut cursor)
        .find(|child| !child.is_extra() && child.kind() != "comment");
    child
}

fn shape_of(node: Node<'_>, source: &str) -> MemberShape {
    match node.kind() {
        "decorated_definition" => {
            let mut cursor = node.walk();
            let decorators: Vec<String> = node
                .named_children(&mut cursor)
                .filter(|child| child.kind() == "decorator")
                .filter_map(|decorator| decorator_name(&decorator, source))
                .collect();
            match node.child_by_field_name("definition") {
                Some(definition) => match definition_shape(&definition, source) {
                    MemberShape::Function { name, .. } => MemberShape::Function { name, decorators },
                    shape => shape,
                },
                None => MemberShape::Other,
            }
        }
        "function_definition" | "class_definition" => definition_shape(&node, source),
        "expression_statement" => match first_named_child(&node) {
            Some(inner) if matches!(inner.kind(), "assignment" | "augmented_assignment") => {
                assignment_shape(inner, source)
            }
            _ => MemberShape::Other,
        },
        _ => MemberShape::Other,
    }
}

fn definition_shape(node: &Node<'_>, source: &str) -> MemberShape {
    let name = node
        .child_by_field_name("name")
        .map(|n| node_text(&n, source).to_string())
        .unwrap_or_default();
    match node.kind() {
        "function_definition" => MemberShape::Function {
            name,
            decorators: Vec::new(),
        },
        "class_definition" => MemberShape::Class { name },
        _ => MemberShape::Other,
    }
}

fn assignment_shape(node: Node<'_>, source: &str) -> MemberShape {
    let mut targets = Vec::new();
    let mut current = node;
    let value = loop {
        if let Some(left) = current.child_by_field_name("left") {
            collect_identifiers(left, source, &mut targets);
        }
        match current.child_by_field_name("right") {
            Some(right) if right.kind() == "assignment" => current = right,
            right => break right,
        }
    };

    if targets.is_empty() {
        return MemberShape::Other;
    }

    MemberShape::Assignment {
        targets,
        field_call: value.is_some_and(|v| is_field_call(&v, source)),
    }
}

fn collect_identifiers(node: Node<'_>, source: &str, out: &mut Vec<String>) {
    match node.kind() {
        "identifier" => out.push(node_text(&node, source).to_string()),
        "pattern_list" | "tuple_pattern" | "list_pattern" | "tuple" | "list" => {
            let mut cursor = node.walk();
            let children: Vec<_> = node.named_children(&mut cursor).collect();
            for child in children {
                collect_identifiers(child, source, out);
            }
        }
        _ => {}
    }
}

/// `fields.Char(...)`, `fields.Many2one(...)` and the like.
fn is_field_call(value: &Node<'_>, source: &str) -> bool {
    value.kind() == "call"
        && value
            .child_by_field_name("function")
            .is_some_and(|function| node_text(&function, source).starts_with("fields."))
}
