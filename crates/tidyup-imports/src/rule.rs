//! The rule interface and the context rules report through.

use std::fmt;

use tidyup_core::patch::{Span, TextEdit};
use tidyup_core::types::SourceLocation;

use crate::ast::{extrema, Program, Ranged};
use crate::error::LintError;

/// An issue reported by a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub rule: &'static str,
    pub message: String,
    /// Byte range the issue is reported at.
    pub span: Span,
    pub loc: SourceLocation,
    /// Proposed replacement, or `None` when the issue cannot be fixed
    /// automatically.
    pub fix: Option<TextEdit>,
}

impl Issue {
    pub fn is_fixable(&self) -> bool {
        self.fix.is_some()
    }
}

/// A configured lint rule.
///
/// Rules are built from validated options, so `check` never sees a bad
/// configuration. An `Err` from `check` aborts the rule for the current file.
pub trait Rule: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    fn check(&self, ctx: &mut RuleContext<'_>) -> Result<(), LintError>;
}

/// Per-file, per-rule reporting context.
#[derive(Debug)]
pub struct RuleContext<'a> {
    program: &'a Program,
    rule: &'static str,
    issues: Vec<Issue>,
}

impl<'a> RuleContext<'a> {
    pub fn new(program: &'a Program, rule: &'static str) -> Self {
        RuleContext {
            program,
            rule,
            issues: Vec::new(),
        }
    }

    pub fn program(&self) -> &'a Program {
        self.program
    }

    pub fn report(&mut self, span: Span, loc: SourceLocation, message: impl Into<String>, fix: Option<TextEdit>) {
        self.issues.push(Issue {
            rule: self.rule,
            message: message.into(),
            span,
            loc,
            fix,
        });
    }

    /// Report an issue at a node.
    pub fn report_node<N: Ranged>(
        &mut self,
        node: &N,
        message: impl Into<String>,
        fix: Option<TextEdit>,
    ) -> Result<(), LintError> {
        let span = node.require_range()?;
        let loc = node.require_loc()?;
        self.report(span, loc, message, fix);
        Ok(())
    }

    /// Report an issue covering `nodes` whose fix replaces their whole extent
    /// with `code`.
    ///
    /// The fix is withheld when anything other than whitespace (and the
    /// `separators`) lies between consecutive nodes, since replacing the
    /// extent would drop it.
    pub fn report_range<N: Ranged>(
        &mut self,
        nodes: &[&N],
        separators: &[char],
        message: impl Into<String>,
        code: String,
    ) -> Result<(), LintError> {
        let (span, loc) = extrema(nodes)?;
        let clean = self.program.only_whitespace_between(nodes, separators)?;
        let fix = clean.then(|| TextEdit::replace(span, code));
        self.report(span, loc, message, fix);
        Ok(())
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn into_issues(self) -> Vec<Issue> {
        self.issues
    }
}
