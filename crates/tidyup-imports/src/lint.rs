//! Lint driver.
//!
//! [`Linter`] runs a set of configured rules over one file. `verify` reports
//! issues; `verify_and_fix` also applies every non-overlapping fix, re-parses
//! and re-runs the rules, and repeats until nothing changes or
//! [`MAX_FIX_PASSES`] is reached. Overlapping fixes are deferred to the next
//! pass rather than merged.

use std::path::Path;

use serde_json::Value;
use tracing::{debug, warn};

use tidyup_core::output::LintOutcome;
use tidyup_core::patch::FixSet;

use crate::ast::Program;
use crate::error::LintError;
use crate::parse::{parse, parse_path};
use crate::rule::{Issue, Rule, RuleContext};
use crate::rules;

/// Upper bound on fix passes per file.
pub const MAX_FIX_PASSES: usize = 10;

/// A rule that aborted on a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FatalMessage {
    pub rule: &'static str,
    pub error: LintError,
}

/// Result of one analysis pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Verification {
    /// Issues ordered by position.
    pub issues: Vec<Issue>,
    pub fatal: Vec<FatalMessage>,
}

impl Verification {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty() && self.fatal.is_empty()
    }

    fn fixes(&self) -> FixSet {
        self.issues.iter().filter_map(|i| i.fix.clone()).collect()
    }
}

/// Result of [`Linter::verify_and_fix`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintReport {
    /// `Fixed` if the output differs from the input, `Invalid` if the input
    /// had issues and none could be fixed, `Valid` otherwise.
    pub result: LintOutcome,
    /// Content after fixing.
    pub output: String,
    /// Issues found in the original content.
    pub issues: Vec<Issue>,
    /// Rules that aborted on the original content.
    pub fatal: Vec<FatalMessage>,
    /// Issues still present in the output.
    pub remaining: Vec<Issue>,
    /// Number of fix passes that changed the content.
    pub passes: usize,
}

/// Runs configured rules over source files.
#[derive(Debug, Default)]
pub struct Linter {
    rules: Vec<Box<dyn Rule>>,
}

impl Linter {
    pub fn new() -> Self {
        Linter::default()
    }

    /// Add a rule (builder style).
    pub fn with_rule(mut self, rule: impl Rule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn push(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }

    /// Build a linter from `(rule name, options)` pairs, validating every
    /// option set before anything runs.
    pub fn configure<'a, I>(rules: I) -> Result<Self, LintError>
    where
        I: IntoIterator<Item = (&'a str, &'a Value)>,
    {
        let mut linter = Linter::new();
        for (name, options) in rules {
            linter.push(rules::configure(name, options)?);
        }
        Ok(linter)
    }

    /// A linter running every built-in rule with default options.
    pub fn with_defaults() -> Result<Self, LintError> {
        let null = Value::Null;
        Linter::configure(rules::RULE_NAMES.iter().map(|&name| (name, &null)))
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Run every rule over an already-built program.
    ///
    /// A rule that fails contributes a [`FatalMessage`] and none of its issues;
    /// the remaining rules still run.
    pub fn verify_program(&self, program: &Program) -> Verification {
        let mut verification = Verification::default();
        for rule in &self.rules {
            let name = rule.name();
            let mut ctx = RuleContext::new(program, name);
            match rule.check(&mut ctx) {
                Ok(()) => {
                    let issues = ctx.into_issues();
                    debug!(
                        rule = name,
                        declarations = program.body.len(),
                        issues = issues.len(),
                        "rule finished"
                    );
                    verification.issues.extend(issues);
                }
                Err(error) => {
                    warn!(rule = name, %error, "rule aborted");
                    verification.fatal.push(FatalMessage { rule: name, error });
                }
            }
        }
        verification
            .issues
            .sort_by_key(|issue| (issue.loc.start.line, issue.loc.start.column));
        verification
    }

    /// Parse `text` as TSX and run every rule over it.
    pub fn verify(&self, text: &str) -> Result<Verification, LintError> {
        Ok(self.verify_program(&parse(text)?))
    }

    /// Like [`Linter::verify`], parsing in the dialect implied by `path`.
    pub fn verify_path(&self, path: &Path, text: &str) -> Result<Verification, LintError> {
        Ok(self.verify_program(&parse_path(path, text)?))
    }

    /// Verify, then apply fixes until a fixpoint.
    ///
    /// Fails if the text (or a fixed version of it) cannot be parsed.
    pub fn verify_and_fix(&self, text: &str) -> Result<LintReport, LintError> {
        self.fix_until_stable(text, parse)
    }

    /// Like [`Linter::verify_and_fix`], parsing in the dialect implied by `path`.
    pub fn verify_and_fix_path(&self, path: &Path, text: &str) -> Result<LintReport, LintError> {
        self.fix_until_stable(text, |t| parse_path(path, t))
    }

    fn fix_until_stable<P>(&self, text: &str, parse: P) -> Result<LintReport, LintError>
    where
        P: Fn(&str) -> Result<Program, LintError>,
    {
        let initial = self.verify_program(&parse(text)?);
        let mut output = text.to_string();
        let mut current = initial.clone();
        let mut passes = 0;

        while passes < MAX_FIX_PASSES {
            let fixes = current.fixes();
            if fixes.is_empty() {
                break;
            }
            let outcome = fixes.apply(&output);
            if !outcome.changed() || outcome.output == output {
                break;
            }
            debug!(
                pass = passes + 1,
                applied = outcome.applied.len(),
                deferred = outcome.deferred.len(),
                "applied fixes"
            );
            output = outcome.output;
            passes += 1;
            current = self.verify_program(&parse(&output)?);
        }

        let result = if output != text {
            LintOutcome::Fixed
        } else if initial.is_clean() {
            LintOutcome::Valid
        } else {
            LintOutcome::Invalid
        };

        Ok(LintReport {
            result,
            output,
            issues: initial.issues,
            fatal: initial.fatal,
            remaining: current.issues,
            passes,
        })
    }
}
