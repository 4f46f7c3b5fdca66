//! Member classification.
//!
//! Classification is a pure function of a member's shape and the
//! [`ClassificationRules`]: the first matching rule wins.
//!
//! | Precedence | Shape      | Rule                                            |
//! |------------|------------|-------------------------------------------------|
//! | 1          | assignment | special name, `_sql_constraints`, model attribute, private, field, property |
//! | 2          | function   | lifecycle/operator dunders, `init`              |
//! | 3          | function   | first marker decorator in precedence order      |
//! | 4          | function   | ORM method override                             |
//! | 5          | function   | name prefixes (`_default_`, `_compute_`, ...)   |
//! | 6          | function   | any other method                                |
//! | 7          | class      | inner class                                     |
//! | 8          | other      | unclassified                                    |

use super::member::{Category, ClassBlock, Member, MemberShape};
use super::rules;
use crate::config::ClassificationRules;

/// Assign a category to every member of a class block.
pub fn classify_block(block: &mut ClassBlock, rules: &ClassificationRules) {
    for member in &mut block.members {
        member.category = classify(member, rules);
    }
}

/// Category of a single member.
pub fn classify(member: &Member, rules: &ClassificationRules) -> Category {
    match &member.shape {
        MemberShape::Assignment {
            targets,
            field_call,
        } => classify_assignment(targets, *field_call, rules),
        MemberShape::Function { name, decorators } => classify_function(name, decorators, rules),
        MemberShape::Class { .. } => Category::InnerClass,
        MemberShape::Other => Category::Other,
    }
}

fn classify_assignment(targets: &[String], field_call: bool, rules: &ClassificationRules) -> Category {
    let private = targets.iter().all(|t| t.starts_with('_'));
    let public = targets.iter().all(|t| !t.starts_with('_'));

    if targets.iter().any(|t| rules::SPECIAL_PROPERTIES.contains(&t.as_str())) {
        Category::SpecialProperty
    } else if targets.iter().any(|t| t == rules::SQL_CONSTRAINTS) {
        Category::SqlConstraint
    } else if targets.iter().any(|t| rules.model_attributes.contains(t)) {
        Category::ModelAttribute
    } else if private {
        Category::PrivateAttribute
    } else if field_call && public {
        Category::Field
    } else {
        Category::Property
    }
}

fn classify_function(name: &str, decorators: &[String], rules: &ClassificationRules) -> Category {
    if rules::LIFECYCLE_OPERATIONS.contains(&name) {
        return Category::Lifecycle;
    }
    if rules::REGULAR_OPERATIONS.contains(&name) {
        return Category::Operator;
    }
    if name == rules::INIT_METHOD {
        return Category::SqlConstraint;
    }

    let marker = rules
        .markers
        .iter()
        .find(|(marker, _)| decorators.iter().any(|d| d == marker));
    if let Some((_, category)) = marker {
        return *category;
    }

    if rules.crud_methods.contains(name) {
        Category::Crud
    } else if name.starts_with(rules::DEFAULT_PREFIX) {
        Category::DefaultMethod
    } else if rules::COMPUTE_PREFIXES.iter().any(|p| name.starts_with(p)) {
        Category::Compute
    } else if name.starts_with(rules::SELECTION_PREFIX) {
        Category::Selection
    } else if name.starts_with(rules::ACTION_PREFIX) {
        Category::Action
    } else {
        Category::Method
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> ClassificationRules {
        ClassificationRules::default()
    }

    fn assignment(targets: &[&str], field_call: bool) -> Member {
        Member::new(
            MemberShape::Assignment {
                targets: targets.iter().map(|t| t.to_string()).collect(),
                field_call,
            },
            0..0,
            0,
        )
    }

    fn function(name: &str, decorators: &[&str]) -> Member {
        Member::new(
            MemberShape::Function {
                name: name.to_string(),
                decorators: decorators.iter().map(|d| d.to_string()).collect(),
            },
            0..0,
            0,
        )
    }

    #[test]
    fn test_assignment_categories() {
        let rules = rules();
        assert_eq!(classify(&assignment(&["__slots__"], false), &rules), Category::SpecialProperty);
        assert_eq!(classify(&assignment(&["_sql_constraints"], false), &rules), Category::SqlConstraint);
        assert_eq!(classify(&assignment(&["_name"], false), &rules), Category::ModelAttribute);
        assert_eq!(classify(&assignment(&["_cache_size"], false), &rules), Category::PrivateAttribute);
        assert_eq!(classify(&assignment(&["_hidden"], true), &rules), Category::PrivateAttribute);
        assert_eq!(classify(&assignment(&["name"], true), &rules), Category::Field);
        assert_eq!(classify(&assignment(&["TIMEOUT"], false), &rules), Category::Property);
    }

    #[test]
    fn test_marker_decorators() {
        let rules = rules();
        assert_eq!(classify(&function("_get_total", &["depends"]), &rules), Category::Compute);
        assert_eq!(classify(&function("_check_dates", &["constrains"]), &rules), Category::Constraint);
        assert_eq!(classify(&function("_update_lines", &["onchange"]), &rules), Category::Onchange);
    }

    #[test]
    fn test_first_marker_in_precedence_wins() {
        let rules = rules();
        // Decorator order on the method does not matter, marker precedence does.
        let member = function("_weird", &["onchange", "constrains", "depends"]);
        assert_eq!(classify(&member, &rules), Category::Compute);
        let member = function("_weird", &["onchange", "constrains"]);
        assert_eq!(classify(&member, &rules), Category::Constraint);
    }

    #[test]
    fn test_marker_beats_orm_name() {
        let rules = rules();
        let member = function("_compute_display_name", &["depends"]);
        assert_eq!(classify(&member, &rules), Category::Compute);
        let member = function("_compute_display_name", &[]);
        assert_eq!(classify(&member, &rules), Category::Crud);
    }

    #[test]
    fn test_name_based_function_categories() {
        let rules = rules();
        assert_eq!(classify(&function("__init__", &[]), &rules), Category::Lifecycle);
        assert_eq!(classify(&function("__repr__", &[]), &rules), Category::Operator);
        assert_eq!(classify(&function("init", &[]), &rules), Category::SqlConstraint);
        assert_eq!(classify(&function("create", &["model_create_multi"]), &rules), Category::Crud);
        assert_eq!(classify(&function("write", &[]), &rules), Category::Crud);
        assert_eq!(classify(&function("_default_user", &[]), &rules), Category::DefaultMethod);
        assert_eq!(classify(&function("_inverse_amount", &[]), &rules), Category::Compute);
        assert_eq!(classify(&function("_selection_states", &[]), &rules), Category::Selection);
        assert_eq!(classify(&function("action_confirm", &[]), &rules), Category::Action);
        assert_eq!(classify(&function("action_archive", &[]), &rules), Category::Crud);
        assert_eq!(classify(&function("_prepare_invoice", &[]), &rules), Category::Method);
    }

    #[test]
    fn test_custom_crud_methods() {
        let mut rules = rules();
        rules.crud_methods.insert("_prepare_invoice".to_string());
        assert_eq!(classify(&function("_prepare_invoice", &[]), &rules), Category::Crud);
    }

    #[test]
    fn test_classes_and_other_statements() {
        let rules = rules();
        let class = Member::new(MemberShape::Class { name: "Meta".into() }, 0..0, 0);
        assert_eq!(classify(&class, &rules), Category::InnerClass);
        let other = Member::new(MemberShape::Other, 0..0, 0);
        assert_eq!(classify(&other, &rules), Category::Other);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let rules = rules();
        let member = function("_compute_total", &["depends"]);
        assert_eq!(classify(&member, &rules), classify(&member, &rules));
    }
}
