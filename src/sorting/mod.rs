//! Class member sorting.
//!
//! A file goes through four stages:
//!
//! 1. [`extractor`] splits each class body into members with line-aligned
//!    spans,
//! 2. [`classifier`] assigns every member a [`Category`],
//! 3. [`orderer`] computes the target permutation,
//! 4. [`rewriter`] splices the member texts back in that order.
//!
//! Classes nested in other classes (or in functions) are sorted first, and
//! their sorted text travels with the enclosing member.

pub mod classifier;
pub mod extractor;
pub mod member;
pub mod orderer;
pub mod rewriter;
pub mod rules;
pub mod text;

pub use member::{Category, ClassBlock, Member, MemberShape};

use std::ops::Range;
use std::path::Path;

use tree_sitter::Node;

use crate::config::SortConfig;
use crate::errors::Result;
use crate::observability::{set_current_class, set_phase, SortPhase};
use crate::parser::{nearest_classes, parse_python};
use text::LineIndex;

const BOM: char = '\u{feff}';

/// Sort the members of every class in `source`.
///
/// Returns the complete new file text. Text outside class regions, a byte
/// order mark included, is copied unchanged.
pub fn sort_source(source: &str, path: &Path, config: &SortConfig) -> Result<String> {
    let (bom, body) = match source.strip_prefix(BOM) {
        Some(rest) => (&source[..BOM.len_utf8()], rest),
        None => ("", source),
    };

    let tree = {
        let _phase = set_phase(SortPhase::Parsing);
        parse_python(body, path)?
    };
    let sorter = ClassSorter::new(body, path, config);
    let edits = sorter.edits_for(&nearest_classes(tree.root_node()))?;

    let mut out = String::with_capacity(source.len());
    out.push_str(bom);
    out.push_str(&sorter.apply(0..body.len(), &edits));
    Ok(out)
}

/// Replacement text for a byte range of the source.
#[derive(Debug)]
struct Edit {
    range: Range<usize>,
    text: String,
}

struct ClassSorter<'a> {
    source: &'a str,
    lines: LineIndex,
    path: &'a Path,
    config: &'a SortConfig,
}

impl<'a> ClassSorter<'a> {
    fn new(source: &'a str, path: &'a Path, config: &'a SortConfig) -> Self {
        Self {
            source,
            lines: LineIndex::new(source),
            path,
            config,
        }
    }

    fn edits_for(&self, classes: &[Node<'_>]) -> Result<Vec<Edit>> {
        let mut edits = Vec::new();
        for class in classes {
            edits.extend(self.class_edits(*class)?);
        }
        edits.sort_by_key(|edit| edit.range.start);
        Ok(edits)
    }

    /// Edits produced by sorting `class` and every class nested in it.
    fn class_edits(&self, class: Node<'_>) -> Result<Vec<Edit>> {
        let Some(mut block) = extractor::extract_class(class, self.source, &self.lines) else {
            return self.edits_for(&nearest_classes(class));
        };
        let _class = set_current_class(block.name.clone());

        let nested = match class.child_by_field_name("body") {
            Some(body) => self.edits_for(&nearest_classes(body))?,
            None => Vec::new(),
        };
        let texts: Vec<String> = block
            .members
            .iter()
            .map(|member| self.apply(member.span.clone(), &nested))
            .collect();

        classifier::classify_block(&mut block, &self.config.rules);
        let permutation = orderer::order(&block.members, self.config);
        if !orderer::is_identity(&permutation) {
            tracing::debug!(
                class = %block.name,
                members = block.members.len(),
                "reordering class members"
            );
        }

        let text = rewriter::rewrite(
            self.source,
            &block,
            &texts,
            &permutation,
            self.config.separators,
            self.path,
        )?;
        Ok(vec![Edit {
            range: block.region,
            text,
        }])
    }

    /// Source text of `range` with every edit inside it substituted.
    fn apply(&self, range: Range<usize>, edits: &[Edit]) -> String {
        let mut out = String::with_capacity(range.len());
        let mut cursor = range.start;
        for edit in edits {
            if edit.range.start < cursor || edit.range.end > range.end {
                continue;
            }
            out.push_str(&self.source[cursor..edit.range.start]);
            out.push_str(&edit.text);
            cursor = edit.range.end;
        }
        out.push_str(&self.source[cursor..range.end]);
        out
    }
}
