//! Configuration for a sorting run.
//!
//! [`OsortConfig`] mirrors the TOML file schema. It is resolved and
//! validated once into a [`SortConfig`], which the sorting pipeline uses
//! read-only from every worker.

mod core;
mod loader;
pub mod validation;

pub use self::core::{MarkerConfig, OsortConfig, SeparatorConfig, UnclassifiedPolicy};
pub use loader::{
    directory_ancestors, load_config, parse_and_validate_config, ConfigSource, LoadedConfig,
    CONFIG_FILE_NAME, MAX_TRAVERSAL_DEPTH,
};

use std::collections::HashSet;

use crate::sorting::rules;
use crate::sorting::Category;

/// Rank of every category, lower sorts first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryOrder {
    ranks: [usize; Category::COUNT],
}

impl CategoryOrder {
    /// Build from a complete permutation of the categories.
    ///
    /// Callers must validate completeness first; see
    /// [`validation::validate_order`].
    pub(crate) fn from_permutation(order: &[Category]) -> Self {
        let mut ranks = [0; Category::COUNT];
        for (rank, category) in order.iter().enumerate() {
            ranks[category.index()] = rank;
        }
        Self { ranks }
    }

    pub fn rank(&self, category: Category) -> usize {
        self.ranks[category.index()]
    }
}

impl Default for CategoryOrder {
    fn default() -> Self {
        Self::from_permutation(&Category::ALL)
    }
}

/// Blank lines emitted between reordered members.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Separators {
    pub within_category: usize,
    pub between_categories: usize,
}

impl Default for Separators {
    fn default() -> Self {
        Self {
            within_category: 1,
            between_categories: 2,
        }
    }
}

/// Name lists and decorator markers used by the classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationRules {
    pub model_attributes: HashSet<String>,
    pub crud_methods: HashSet<String>,
    /// Decorator name to category, in precedence order.
    pub markers: Vec<(String, Category)>,
}

impl Default for ClassificationRules {
    fn default() -> Self {
        let markers = [
            (rules::COMPUTE_MARKERS, Category::Compute),
            (rules::CONSTRAINT_MARKERS, Category::Constraint),
            (rules::ONCHANGE_MARKERS, Category::Onchange),
        ]
        .into_iter()
        .flat_map(|(names, category)| names.iter().map(move |n| (n.to_string(), category)))
        .collect();

        Self {
            model_attributes: rules::MODEL_ATTRIBUTES.iter().map(|s| s.to_string()).collect(),
            crud_methods: rules::ORM_METHODS.iter().map(|s| s.to_string()).collect(),
            markers,
        }
    }
}

/// Validated, immutable configuration shared by all workers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortConfig {
    pub order: CategoryOrder,
    pub unclassified: UnclassifiedPolicy,
    pub sort_fields: bool,
    pub rules: ClassificationRules,
    pub separators: Separators,
    pub exclude: Vec<String>,
}
