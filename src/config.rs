//! `tidyup.toml` configuration.
//!
//! ```toml
//! [rules.group-imports]
//! options = { groups = [{ class = "node" }, "@app", { class = "relative" }] }
//!
//! [rules.sort-imports]
//! enabled = true
//! options = { caseGroups = true, typesInGroup = "top" }
//! ```
//!
//! Every rule runs with its default options unless the file disables it or
//! supplies `options`. Options are passed through to the rule unchanged (as
//! JSON) and validated there.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use tidyup_core::error::TidyError;
use tidyup_imports::rules::RULE_NAMES;
use tidyup_imports::Linter;

/// Config file looked up in the workspace root.
pub const CONFIG_FILE: &str = "tidyup.toml";

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },

    #[error("unknown rule `{name}` (expected one of: {})", RULE_NAMES.join(", "))]
    UnknownRule { name: String },

    #[error("options for `{name}` cannot be represented as JSON: {source}")]
    Options {
        name: String,
        source: serde_json::Error,
    },
}

impl From<ConfigError> for TidyError {
    fn from(err: ConfigError) -> Self {
        TidyError::invalid_config(CONFIG_FILE, err.to_string())
    }
}

// ============================================================================
// Config
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub rules: BTreeMap<String, RuleConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub options: Option<toml::Value>,
}

fn default_enabled() -> bool {
    true
}

impl Config {
    pub fn parse(content: &str, path: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }

    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        Config::parse(&content, &display)
    }

    /// Load `tidyup.toml` from `root`, or the defaults when there is none.
    pub fn load_from_root(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join(CONFIG_FILE);
        if path.is_file() {
            Config::load(&path)
        } else {
            Ok(Config::default())
        }
    }

    /// Enabled rules with their options as JSON, in rule registration order.
    pub fn rule_options(&self) -> Result<Vec<(&'static str, Value)>, ConfigError> {
        let unknown = self
            .rules
            .keys()
            .find(|k| !RULE_NAMES.iter().any(|name| *name == k.as_str()));
        if let Some(name) = unknown {
            return Err(ConfigError::UnknownRule { name: name.clone() });
        }

        let mut out = Vec::new();
        for name in RULE_NAMES {
            let options = match self.rules.get(name) {
                None => Value::Null,
                Some(rule) if !rule.enabled => continue,
                Some(RuleConfig { options: None, .. }) => Value::Null,
                Some(RuleConfig {
                    options: Some(options),
                    ..
                }) => serde_json::to_value(options).map_err(|source| ConfigError::Options {
                    name: name.to_string(),
                    source,
                })?,
            };
            out.push((name, options));
        }
        Ok(out)
    }

    /// Build a linter, validating every rule's options.
    pub fn linter(&self) -> Result<Linter, TidyError> {
        let rules = self.rule_options()?;
        let linter = Linter::configure(rules.iter().map(|(name, options)| (*name, options)))?;
        Ok(linter)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    mod parsing {
        use super::*;

        #[test]
        fn empty_file_enables_every_rule() {
            let config = Config::parse("", "tidyup.toml").unwrap();
            let rules = config.rule_options().unwrap();
            assert_eq!(
                rules,
                vec![("group-imports", Value::Null), ("sort-imports", Value::Null)]
            );
        }

        #[test]
        fn options_become_json() {
            let config = Config::parse(
                r#"
                [rules.group-imports]
                options = ["fs", { class = "relative", types = "only" }]

                [rules.sort-imports]
                options = { caseGroups = true, locales = ["en-US"] }
                "#,
                "tidyup.toml",
            )
            .unwrap();
            let rules = config.rule_options().unwrap();
            assert_eq!(rules[0].1, json!(["fs", { "class": "relative", "types": "only" }]));
            assert_eq!(rules[1].1, json!({ "caseGroups": true, "locales": ["en-US"] }));
        }

        #[test]
        fn disabled_rules_are_skipped() {
            let config = Config::parse("[rules.sort-imports]\nenabled = false\n", "t").unwrap();
            let names: Vec<_> = config.rule_options().unwrap().into_iter().map(|(n, _)| n).collect();
            assert_eq!(names, ["group-imports"]);
        }

        #[test]
        fn unknown_rule_is_rejected() {
            let config = Config::parse("[rules.no-console]\n", "t").unwrap();
            let err = config.rule_options().unwrap_err();
            assert!(matches!(err, ConfigError::UnknownRule { ref name } if name == "no-console"));
        }

        #[test]
        fn unknown_keys_are_rejected() {
            let err = Config::parse("[rules.sort-imports]\nseverity = 2\n", "t").unwrap_err();
            assert!(matches!(err, ConfigError::Parse { .. }));
        }
    }

    mod linter {
        use super::*;
        use tidyup_core::error::OutputErrorCode;

        #[test]
        fn invalid_options_are_config_errors() {
            let config = Config::parse(
                "[rules.sort-imports]\noptions = { typesInGroup = \"middle\" }\n",
                "t",
            )
            .unwrap();
            let err = config.linter().unwrap_err();
            assert_eq!(err.error_code(), OutputErrorCode::InvalidArguments);
        }

        #[test]
        fn missing_file_means_defaults() {
            let dir = tempfile::tempdir().unwrap();
            let config = Config::load_from_root(dir.path()).unwrap();
            let linter = config.linter().unwrap();
            assert_eq!(linter.rule_names(), ["group-imports", "sort-imports"]);
        }
    }
}
