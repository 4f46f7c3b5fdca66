//! Reassembly of a class region in a new member order.

use std::path::Path;

use super::member::ClassBlock;
use super::orderer::is_identity;
use crate::config::Separators;
use crate::errors::{Result, SortError};

/// Rebuild the region of `block` with its members in `permutation` order.
///
/// `texts[i]` is the text of member `i` (its span, possibly with nested
/// classes already sorted). An identity permutation reproduces the original
/// spacing byte for byte. Otherwise members are joined by
/// `separators.within_category` blank lines inside a category and
/// `separators.between_categories` blank lines between categories.
pub fn rewrite(
    source: &str,
    block: &ClassBlock,
    texts: &[String],
    permutation: &[usize],
    separators: Separators,
    path: &Path,
) -> Result<String> {
    check_inputs(block, texts, permutation, path)?;

    let mut out = String::with_capacity(block.region.len() + 16);
    if is_identity(permutation) {
        for (member, text) in block.members.iter().zip(texts) {
            out.push_str(&source[member.gap.clone()]);
            out.push_str(text);
        }
        return Ok(out);
    }

    let newline = block.newline;
    let ends_with_newline = texts.last().is_some_and(|t| t.ends_with('\n'));
    let mut previous = None;
    for &index in permutation {
        let category = block.members[index].category;
        if let Some(prev) = previous {
            if !out.ends_with('\n') {
                out.push_str(newline);
            }
            let blank_lines = if prev == category {
                separators.within_category
            } else {
                separators.between_categories
            };
            for _ in 0..blank_lines {
                out.push_str(newline);
            }
        }
        out.push_str(&texts[index]);
        previous = Some(category);
    }

    if !ends_with_newline {
        strip_trailing_newline(&mut out);
    } else if !out.ends_with('\n') {
        out.push_str(newline);
    }
    Ok(out)
}

fn check_inputs(
    block: &ClassBlock,
    texts: &[String],
    permutation: &[usize],
    path: &Path,
) -> Result<()> {
    let count = block.members.len();
    if texts.len() != count || permutation.len() != count {
        return Err(SortError::consistency(
            path,
            format!(
                "class {} has {} members but {} texts and a permutation of {}",
                block.name,
                count,
                texts.len(),
                permutation.len()
            ),
        ));
    }

    let mut seen = vec![false; count];
    for &index in permutation {
        match seen.get_mut(index) {
            Some(slot) if !*slot => *slot = true,
            _ => {
                return Err(SortError::consistency(
                    path,
                    format!("invalid member permutation for class {}", block.name),
                ))
            }
        }
    }
    Ok(())
}

fn strip_trailing_newline(text: &mut String) {
    if text.ends_with("\r\n") {
        text.truncate(text.len() - 2);
    } else if text.ends_with('\n') {
        text.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sorting::member::{Category, Member, MemberShape};
    use pretty_assertions::assert_eq;

    /// Build a block over `source` where each part is one member's span and
    /// the parts are separated by single blank lines.
    fn block_of(parts: &[(&str, Category)], blank: &str) -> (String, ClassBlock, Vec<String>) {
        let mut source = String::new();
        let mut members = Vec::new();
        for (i, (text, category)) in parts.iter().enumerate() {
            let gap_start = source.len();
            if i > 0 {
                source.push_str(blank);
            }
            let start = source.len();
            source.push_str(text);
            let mut member = Member::new(MemberShape::Other, start..source.len(), i);
            member.gap = if i > 0 { gap_start..start } else { start..start };
            member.category = *category;
            members.push(member);
        }
        let texts = members.iter().map(|m| source[m.span.clone()].to_string()).collect();
        let block = ClassBlock {
            name: "Sale".into(),
            region: 0..source.len(),
            members,
            newline: "\n",
        };
        (source, block, texts)
    }

    #[test]
    fn test_identity_preserves_original_spacing() {
        let (source, block, texts) = block_of(
            &[
                ("    _name = 'sale'\n", Category::ModelAttribute),
                ("    name = fields.Char()\n", Category::Field),
            ],
            "\n\n\n",
        );
        let out = rewrite(&source, &block, &texts, &[0, 1], Separators::default(), Path::new("a.py"))
            .unwrap();
        assert_eq!(out, source);
    }

    #[test]
    fn test_separators_between_and_within_categories() {
        let (source, block, texts) = block_of(
            &[
                ("    def action_a(self):\n        pass\n", Category::Action),
                ("    name = fields.Char()\n", Category::Field),
                ("    state = fields.Char()\n", Category::Field),
            ],
            "\n",
        );
        let out = rewrite(&source, &block, &texts, &[1, 2, 0], Separators::default(), Path::new("a.py"))
            .unwrap();
        assert_eq!(
            out,
            "    name = fields.Char()\n\n    state = fields.Char()\n\n\n    def action_a(self):\n        pass\n"
        );
    }

    #[test]
    fn test_missing_final_newline_moves_with_region_end() {
        let (source, block, texts) = block_of(
            &[
                ("    def action_a(self):\n        pass\n", Category::Action),
                ("    name = fields.Char()", Category::Field),
            ],
            "\n",
        );
        let separators = Separators {
            within_category: 0,
            between_categories: 1,
        };
        let out = rewrite(&source, &block, &texts, &[1, 0], separators, Path::new("a.py")).unwrap();
        assert_eq!(out, "    name = fields.Char()\n\n    def action_a(self):\n        pass");
    }

    #[test]
    fn test_crlf_separators() {
        let (source, mut block, texts) = block_of(
            &[
                ("    b = 1\r\n", Category::Method),
                ("    _a = 1\r\n", Category::PrivateAttribute),
            ],
            "\r\n",
        );
        block.newline = "\r\n";
        let out = rewrite(&source, &block, &texts, &[1, 0], Separators::default(), Path::new("a.py"))
            .unwrap();
        assert_eq!(out, "    _a = 1\r\n\r\n\r\n    b = 1\r\n");
    }

    #[test]
    fn test_invalid_permutation_is_a_consistency_error() {
        let (source, block, texts) = block_of(
            &[("    a = 1\n", Category::Property), ("    b = 1\n", Category::Property)],
            "\n",
        );
        for permutation in [vec![0, 0], vec![0], vec![0, 2]] {
            let err = rewrite(&source, &block, &texts, &permutation, Separators::default(), Path::new("a.py"))
                .unwrap_err();
            assert!(err.is_internal());
        }
    }
}
