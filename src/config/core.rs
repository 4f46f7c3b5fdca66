use serde::{Deserialize, Serialize};

use crate::sorting::Category;

/// Root configuration structure, as written in `.osort.toml` or under
/// `[tool.osort]` in `pyproject.toml`.
///
/// Every key is optional; missing keys fall back to the built-in Odoo
/// convention when the configuration is resolved.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OsortConfig {
    /// Complete category order, first to last
    #[serde(default)]
    pub order: Option<Vec<Category>>,

    /// Placement of members no rule recognises
    #[serde(default)]
    pub unclassified: Option<UnclassifiedPolicy>,

    /// Sort field declarations alphabetically
    #[serde(default)]
    pub sort_fields: Option<bool>,

    /// Glob patterns of files to skip
    #[serde(default)]
    pub exclude: Option<Vec<String>>,

    /// Replaces the built-in list of ORM method names
    #[serde(default)]
    pub crud_methods: Option<Vec<String>>,

    /// Extends the ORM method list
    #[serde(default)]
    pub extra_crud_methods: Option<Vec<String>>,

    /// Replaces the built-in list of Odoo model attributes
    #[serde(default)]
    pub model_attributes: Option<Vec<String>>,

    /// Decorator names per marker category
    #[serde(default)]
    pub markers: Option<MarkerConfig>,

    /// Blank lines inserted between moved members
    #[serde(default)]
    pub separators: Option<SeparatorConfig>,
}

impl OsortConfig {
    /// Get exclude patterns from configuration
    pub fn get_exclude_patterns(&self) -> Vec<String> {
        self.exclude.clone().unwrap_or_default()
    }
}

/// Where members of the `other` category end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnclassifiedPolicy {
    /// Sort after every other category
    #[default]
    Last,
    /// Stay at their original position; classified members sort around them
    Keep,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MarkerConfig {
    #[serde(default = "default_compute_markers")]
    pub compute: Vec<String>,
    #[serde(default = "default_constraint_markers")]
    pub constraint: Vec<String>,
    #[serde(default = "default_onchange_markers")]
    pub onchange: Vec<String>,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            compute: default_compute_markers(),
            constraint: default_constraint_markers(),
            onchange: default_onchange_markers(),
        }
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

pub fn default_compute_markers() -> Vec<String> {
    to_strings(crate::sorting::rules::COMPUTE_MARKERS)
}

pub fn default_constraint_markers() -> Vec<String> {
    to_strings(crate::sorting::rules::CONSTRAINT_MARKERS)
}

pub fn default_onchange_markers() -> Vec<String> {
    to_strings(crate::sorting::rules::ONCHANGE_MARKERS)
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SeparatorConfig {
    /// Blank lines between members of the same category
    #[serde(default = "default_within_category")]
    pub within_category: usize,
    /// Blank lines between category groups
    #[serde(default = "default_between_categories")]
    pub between_categories: usize,
}

impl Default for SeparatorConfig {
    fn default() -> Self {
        Self {
            within_category: default_within_category(),
            between_categories: default_between_categories(),
        }
    }
}

pub fn default_within_category() -> usize {
    1
}

pub fn default_between_categories() -> usize {
    2
}

/// `pyproject.toml` wrapper used to reach `[tool.osort]`.
#[derive(Debug, Deserialize)]
pub(crate) struct PyProject {
    #[serde(default)]
    pub tool: Option<PyProjectTools>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PyProjectTools {
    #[serde(default)]
    pub osort: Option<OsortConfig>,
}
