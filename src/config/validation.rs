//! Validation of file configuration.
//!
//! Validators return a [`ConfigValidation`] and are combined so that every
//! check runs and all problems are reported together: a user fixing a config
//! file sees the full list at once.

use std::collections::{HashMap, HashSet};

use stillwater::{NonEmptyVec, Validation};

use super::core::{MarkerConfig, OsortConfig, SeparatorConfig};
use super::{CategoryOrder, ClassificationRules, Separators, SortConfig};
use crate::errors::{Result, SortError};
use crate::sorting::Category;

/// Largest accepted separator; more blank lines than this is never the
/// house style.
pub const MAX_SEPARATOR_LINES: usize = 2;

/// Outcome of a check, carrying every problem message on failure.
pub type ConfigValidation<T> = Validation<T, NonEmptyVec<String>>;

impl OsortConfig {
    /// Validate and resolve into the immutable run configuration.
    pub fn resolve(&self) -> Result<SortConfig> {
        if let Validation::Failure(errors) = validate_config(self) {
            return Err(SortError::config(errors.into_vec().join("; ")));
        }

        let order = match &self.order {
            Some(order) => CategoryOrder::from_permutation(order),
            None => CategoryOrder::default(),
        };

        Ok(SortConfig {
            order,
            unclassified: self.unclassified.unwrap_or_default(),
            sort_fields: self.sort_fields.unwrap_or(false),
            rules: resolve_rules(self),
            separators: resolve_separators(self.separators.as_ref()),
            exclude: self.get_exclude_patterns(),
        })
    }
}

/// Validate the whole config, accumulating the errors of every section.
pub fn validate_config(config: &OsortConfig) -> ConfigValidation<()> {
    let mut validations = vec![validate_exclude_patterns(&config.get_exclude_patterns())];
    if let Some(order) = &config.order {
        validations.insert(0, validate_order(order));
    }
    if let Some(markers) = &config.markers {
        validations.push(validate_markers(markers));
    }
    if let Some(separators) = &config.separators {
        validations.push(validate_separators(separators));
    }
    combine_validations(validations)
}

/// Merge validations, keeping every failure in order.
pub fn combine_validations(validations: Vec<ConfigValidation<()>>) -> ConfigValidation<()> {
    let mut failures = Vec::new();
    for validation in validations {
        if let Validation::Failure(errors) = validation {
            failures.extend(errors.into_vec());
        }
    }
    from_messages(failures)
}

fn from_messages(messages: Vec<String>) -> ConfigValidation<()> {
    match NonEmptyVec::from_vec(messages) {
        Some(errors) => Validation::Failure(errors),
        None => Validation::Success(()),
    }
}

/// The order must name every category exactly once.
pub fn validate_order(order: &[Category]) -> ConfigValidation<()> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();
    for category in order {
        if !seen.insert(*category) {
            errors.push(format!("order lists `{category}` more than once"));
        }
    }
    let missing: Vec<&str> = Category::ALL
        .iter()
        .filter(|c| !seen.contains(*c))
        .map(|c| c.as_str())
        .collect();
    if !missing.is_empty() {
        errors.push(format!("order is missing {}", missing.join(", ")));
    }
    from_messages(errors)
}

fn validate_markers(markers: &MarkerConfig) -> ConfigValidation<()> {
    let mut errors = Vec::new();
    let mut owners: HashMap<&str, Category> = HashMap::new();

    for (category, names) in marker_lists(markers) {
        if names.is_empty() {
            errors.push(format!("markers.{category} must not be empty"));
        }
        for name in names {
            if !is_identifier(name) {
                errors.push(format!(
                    "markers.{category} contains `{name}`, which is not a decorator name"
                ));
                continue;
            }
            match owners.get(name.as_str()) {
                Some(owner) if *owner != category => errors.push(format!(
                    "decorator `{name}` is a marker for both {owner} and {category}"
                )),
                _ => {
                    owners.insert(name.as_str(), category);
                }
            }
        }
    }
    from_messages(errors)
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

fn validate_separators(separators: &SeparatorConfig) -> ConfigValidation<()> {
    let errors = [
        ("within_category", separators.within_category),
        ("between_categories", separators.between_categories),
    ]
    .into_iter()
    .filter(|(_, value)| *value > MAX_SEPARATOR_LINES)
    .map(|(key, value)| {
        format!("separators.{key} is {value}, at most {MAX_SEPARATOR_LINES} blank lines allowed")
    })
    .collect();
    from_messages(errors)
}

fn validate_exclude_patterns(patterns: &[String]) -> ConfigValidation<()> {
    let errors = patterns
        .iter()
        .enumerate()
        .filter_map(|(i, pattern)| {
            glob::Pattern::new(pattern)
                .err()
                .map(|e| format!("invalid exclude pattern #{}: '{}' - {}", i + 1, pattern, e))
        })
        .collect();
    from_messages(errors)
}

fn marker_lists(markers: &MarkerConfig) -> [(Category, &Vec<String>); 3] {
    [
        (Category::Compute, &markers.compute),
        (Category::Constraint, &markers.constraint),
        (Category::Onchange, &markers.onchange),
    ]
}

fn resolve_rules(config: &OsortConfig) -> ClassificationRules {
    let mut rules = ClassificationRules::default();

    if let Some(attributes) = &config.model_attributes {
        rules.model_attributes = attributes.iter().cloned().collect();
    }
    if let Some(methods) = &config.crud_methods {
        rules.crud_methods = methods.iter().cloned().collect();
    }
    if let Some(extra) = &config.extra_crud_methods {
        rules.crud_methods.extend(extra.iter().cloned());
    }
    if let Some(markers) = &config.markers {
        rules.markers = marker_lists(markers)
            .into_iter()
            .flat_map(|(category, names)| names.iter().map(move |n| (n.clone(), category)))
            .collect();
    }
    rules
}

fn resolve_separators(separators: Option<&SeparatorConfig>) -> Separators {
    separators
        .map(|s| Separators {
            within_category: s.within_category,
            between_categories: s.between_categories,
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UnclassifiedPolicy;

    fn parse(toml_text: &str) -> OsortConfig {
        toml::from_str(toml_text).unwrap()
    }

    fn errors_of(config: &OsortConfig) -> Vec<String> {
        match validate_config(config) {
            Validation::Success(()) => Vec::new(),
            Validation::Failure(errors) => errors.into_vec(),
        }
    }

    #[test]
    fn test_empty_config_resolves_to_defaults() {
        let resolved = OsortConfig::default().resolve().unwrap();
        assert_eq!(resolved, SortConfig::default());
    }

    #[test]
    fn test_resolve_overrides() {
        let config = parse(
            r#"
            unclassified = "keep"
            sort_fields = true
            crud_methods = ["create"]
            extra_crud_methods = ["_prepare_invoice"]
            model_attributes = ["_name"]

            [markers]
            compute = ["depends", "depends_context"]

            [separators]
            within_category = 0
            between_categories = 1
            "#,
        );
        let resolved = config.resolve().unwrap();

        assert_eq!(resolved.unclassified, UnclassifiedPolicy::Keep);
        assert!(resolved.sort_fields);
        assert_eq!(resolved.rules.crud_methods.len(), 2);
        assert!(resolved.rules.crud_methods.contains("_prepare_invoice"));
        assert!(!resolved.rules.model_attributes.contains("_inherit"));
        assert_eq!(resolved.rules.markers[1], ("depends_context".to_string(), Category::Compute));
        assert_eq!(resolved.rules.markers.len(), 4);
        assert_eq!(
            resolved.separators,
            Separators {
                within_category: 0,
                between_categories: 1
            }
        );
    }

    #[test]
    fn test_incomplete_order_is_rejected() {
        let config = parse(r#"order = ["field", "field", "method"]"#);
        let errors = errors_of(&config);
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("more than once"));
        assert!(errors[1].contains("missing special_property"));
        assert!(config.resolve().unwrap_err().is_fatal());
    }

    #[test]
    fn test_complete_custom_order_is_accepted() {
        let mut order: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
        order.reverse();
        let quoted: Vec<String> = order.iter().map(|c| format!("\"{c}\"")).collect();
        let config = parse(&format!("order = [{}]", quoted.join(", ")));
        let resolved = config.resolve().unwrap();
        assert_eq!(resolved.order.rank(Category::Other), 0);
    }

    #[test]
    fn test_marker_errors_accumulate() {
        let config = parse(
            r#"
            [markers]
            compute = []
            constraint = ["depends"]
            onchange = [""]
            "#,
        );
        let errors = errors_of(&config);
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("markers.compute must not be empty"));
        assert!(errors[1].contains("not a decorator name"));

        let config = parse(
            r#"
            [markers]
            constraint = ["depends"]
            "#,
        );
        let errors = errors_of(&config);
        assert_eq!(errors, vec!["decorator `depends` is a marker for both compute and constraint"]);
    }

    #[test]
    fn test_dotted_marker_is_rejected() {
        let config = parse("[markers]\nonchange = [\"api.onchange\"]\n");
        assert_eq!(errors_of(&config).len(), 1);
    }

    #[test]
    fn test_errors_from_every_section_are_combined() {
        let config = parse(
            r#"
            order = ["field"]
            exclude = ["[broken"]

            [markers]
            onchange = []

            [separators]
            within_category = 5
            "#,
        );
        let errors = errors_of(&config);
        assert_eq!(errors.len(), 4);
        assert!(errors[0].starts_with("order is missing"));
        assert!(errors[1].starts_with("invalid exclude pattern #1"));
        assert!(errors[2].contains("markers.onchange must not be empty"));
        assert!(errors[3].contains("within_category is 5"));

        let message = config.resolve().unwrap_err().to_string();
        assert_eq!(message.matches("; ").count(), 3);
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(matches!(
            validate_config(&OsortConfig::default()),
            Validation::Success(())
        ));
        assert!(matches!(
            validate_order(&Category::ALL),
            Validation::Success(())
        ));
    }

    #[test]
    fn test_separator_limit() {
        let config = parse("[separators]\nbetween_categories = 3\n");
        let errors = errors_of(&config);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("between_categories is 3"));
    }

    #[test]
    fn test_invalid_exclude_pattern() {
        let config = parse(r#"exclude = ["ok/**", "[broken"]"#);
        let errors = errors_of(&config);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("invalid exclude pattern #2"));
    }
}
