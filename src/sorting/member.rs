//! Class members and the categories they are sorted by.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

/// Slot of the canonical Odoo member ordering.
///
/// Variants are declared in the default order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// `__slots__`, `__doc__`
    SpecialProperty,
    /// Nested class definitions
    InnerClass,
    /// `_name`, `_inherit`, `_order` and the other Odoo model attributes
    ModelAttribute,
    /// Any other `_`-prefixed class attribute
    PrivateAttribute,
    /// `_default_*` methods referenced by field defaults
    DefaultMethod,
    /// Public class attributes that are not fields
    Property,
    /// `fields.*(...)` declarations
    Field,
    /// `_sql_constraints` and `init`
    SqlConstraint,
    /// `__init__`, `__new__` and friends
    Lifecycle,
    /// `@api.depends` methods, `_compute_*`, `_inverse_*`, `_search_*`
    Compute,
    /// `_selection_*` methods
    Selection,
    /// `@api.constrains` methods
    Constraint,
    /// `@api.onchange` methods
    Onchange,
    /// Overrides of ORM methods (`create`, `write`, `unlink`, ...)
    Crud,
    /// `action_*` methods
    Action,
    /// Every other method
    Method,
    /// Protocol dunders such as `__call__` or `__repr__`
    Operator,
    /// Statements no rule recognises
    Other,
}

impl Category {
    pub const COUNT: usize = 18;

    /// All categories in default order.
    pub const ALL: [Category; Category::COUNT] = [
        Category::SpecialProperty,
        Category::InnerClass,
        Category::ModelAttribute,
        Category::PrivateAttribute,
        Category::DefaultMethod,
        Category::Property,
        Category::Field,
        Category::SqlConstraint,
        Category::Lifecycle,
        Category::Compute,
        Category::Selection,
        Category::Constraint,
        Category::Onchange,
        Category::Crud,
        Category::Action,
        Category::Method,
        Category::Operator,
        Category::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::SpecialProperty => "special_property",
            Self::InnerClass => "inner_class",
            Self::ModelAttribute => "model_attribute",
            Self::PrivateAttribute => "private_attribute",
            Self::DefaultMethod => "default_method",
            Self::Property => "property",
            Self::Field => "field",
            Self::SqlConstraint => "sql_constraint",
            Self::Lifecycle => "lifecycle",
            Self::Compute => "compute",
            Self::Selection => "selection",
            Self::Constraint => "constraint",
            Self::Onchange => "onchange",
            Self::Crud => "crud",
            Self::Action => "action",
            Self::Method => "method",
            Self::Operator => "operator",
            Self::Other => "other",
        }
    }

    /// Position in [`Category::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| format!("unknown category `{s}`"))
    }
}

/// Syntactic shape of a member, as far as classification cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberShape {
    /// Plain, annotated or augmented assignment.
    Assignment {
        targets: Vec<String>,
        /// Value is a `fields.*(...)` constructor call.
        field_call: bool,
    },
    /// `def` or `async def`, possibly decorated.
    Function {
        name: String,
        decorators: Vec<String>,
    },
    Class {
        name: String,
    },
    Other,
}

/// One top-level statement of a class body together with its attached
/// comments and decorators.
#[derive(Debug, Clone)]
pub struct Member {
    /// First bound name, empty for anonymous statements.
    pub name: String,
    pub shape: MemberShape,
    /// Line-aligned byte span in the original file. Trailing blank lines are
    /// not part of the span.
    pub span: Range<usize>,
    /// Blank-line bytes between the previous member's span and this one.
    pub gap: Range<usize>,
    pub original_index: usize,
    pub category: Category,
}

impl Member {
    pub fn new(shape: MemberShape, span: Range<usize>, original_index: usize) -> Self {
        let name = match &shape {
            MemberShape::Assignment { targets, .. } => targets.first().cloned().unwrap_or_default(),
            MemberShape::Function { name, .. } | MemberShape::Class { name } => name.clone(),
            MemberShape::Other => String::new(),
        };
        Self {
            name,
            shape,
            gap: span.start..span.start,
            span,
            original_index,
            category: Category::Other,
        }
    }

    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.clone()]
    }
}

/// The reorderable part of one class definition.
///
/// `region` runs from the first movable member's span start to the last
/// member's span end. The class header, a leading docstring and anything
/// between them stay outside the region and never move.
#[derive(Debug, Clone)]
pub struct ClassBlock {
    pub name: String,
    pub region: Range<usize>,
    pub members: Vec<Member>,
    pub newline: &'static str,
}

impl ClassBlock {
    /// Rebuild the region text from member spans and their recorded gaps.
    ///
    /// Equal to `&source[self.region]` for every block the extractor
    /// produces.
    pub fn reassemble(&self, source: &str) -> String {
        let mut out = String::with_capacity(self.region.len());
        for member in &self.members {
            out.push_str(&source[member.gap.clone()]);
            out.push_str(member.text(source));
        }
        out
    }
}
