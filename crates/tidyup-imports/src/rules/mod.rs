//! Built-in rules and the registry that configures them by name.

mod group_imports;
mod sort_imports;

pub use group_imports::GroupImports;
pub use sort_imports::SortImports;

use serde_json::Value;

use crate::error::LintError;
use crate::rule::Rule;

pub const GROUP_IMPORTS: &str = "group-imports";
pub const SORT_IMPORTS: &str = "sort-imports";

/// Names of all built-in rules.
pub const RULE_NAMES: [&str; 2] = [GROUP_IMPORTS, SORT_IMPORTS];

/// Build a rule by name from its options, validating them.
pub fn configure(name: &str, options: &Value) -> Result<Box<dyn Rule>, LintError> {
    match name {
        GROUP_IMPORTS => Ok(Box::new(GroupImports::from_options(options)?)),
        SORT_IMPORTS => Ok(Box::new(SortImports::from_options(options)?)),
        other => Err(LintError::UnknownRule {
            name: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn configures_known_rules() {
        for name in RULE_NAMES {
            let rule = configure(name, &Value::Null).unwrap();
            assert_eq!(rule.name(), name);
        }
    }

    #[test]
    fn rejects_unknown_rule() {
        let err = configure("no-commented-code", &Value::Null).unwrap_err();
        assert_eq!(
            err,
            LintError::UnknownRule {
                name: "no-commented-code".to_string()
            }
        );
    }

    #[test]
    fn validates_before_use() {
        assert!(configure(GROUP_IMPORTS, &json!([{ "class": "nope" }])).is_err());
        assert!(configure(SORT_IMPORTS, &json!({ "caseFirst": "middle" })).is_err());
    }
}
