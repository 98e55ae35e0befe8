//! Errors raised by the import organizer rules and their host adapter.

use thiserror::Error;
use tidyup_core::error::TidyError;

/// Errors produced while configuring or running a lint rule.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LintError {
    /// Rule options failed validation. No analysis is performed.
    #[error("invalid options for {rule}: {reason}")]
    InvalidOptions { rule: String, reason: String },

    /// A node the rule needs a line/column location for has none.
    #[error("{what} is missing location information")]
    MissingLocation { what: &'static str },

    /// A node the rule needs a byte range for has none.
    #[error("{what} is missing range information")]
    MissingRange { what: &'static str },

    /// The source text is not a well-formed module.
    #[error("syntax error: {reason}")]
    Parse { reason: String },

    /// No rule is registered under this name.
    #[error("unknown rule: {name}")]
    UnknownRule { name: String },
}

impl LintError {
    /// Create an invalid-options error.
    pub fn invalid_options(rule: impl Into<String>, reason: impl Into<String>) -> Self {
        LintError::InvalidOptions {
            rule: rule.into(),
            reason: reason.into(),
        }
    }

    /// Create a parse error.
    pub fn parse(reason: impl Into<String>) -> Self {
        LintError::Parse {
            reason: reason.into(),
        }
    }

    /// Whether this error reports a malformed syntax tree rather than bad input.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            LintError::MissingLocation { .. } | LintError::MissingRange { .. }
        )
    }
}

impl From<LintError> for TidyError {
    fn from(err: LintError) -> Self {
        match err {
            LintError::InvalidOptions { rule, reason } => TidyError::invalid_config(rule, reason),
            LintError::UnknownRule { name } => {
                TidyError::invalid_config(name, "no rule with this name")
            }
            other => TidyError::internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidyup_core::error::OutputErrorCode;

    #[test]
    fn invalid_options_become_config_errors() {
        let err: TidyError = LintError::invalid_options("sort-imports", "bad locale").into();
        assert_eq!(err.error_code(), OutputErrorCode::InvalidArguments);
        assert_eq!(
            err.to_string(),
            "invalid configuration for sort-imports: bad locale"
        );
    }

    #[test]
    fn invariant_violations_become_internal_errors() {
        let err = LintError::MissingRange {
            what: "import declaration",
        };
        assert!(err.is_invariant_violation());
        let err: TidyError = err.into();
        assert_eq!(err.error_code(), OutputErrorCode::InternalError);
    }
}
