//! Declaration model consumed by the import rules.
//!
//! A [`Program`] is the source text of one module plus its module
//! declarations (imports and re-exports) in source order, and its comments.
//! Hosts may build one from any parser; [`crate::parse`] is the built-in host.
//!
//! Every node carries an optional byte range and an optional line/column
//! location. Rules require both; a node missing either is a malformed tree and
//! aborts the rule for that file.

use serde::{Deserialize, Serialize};
use tidyup_core::patch::Span;
use tidyup_core::types::SourceLocation;

use crate::error::LintError;

// ============================================================================
// Nodes
// ============================================================================

/// Kind of a module declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationKind {
    /// `import ... from 'x'` or `import 'x'`.
    Import,
    /// `export * from 'x'`, `export * as ns from 'x'`.
    ExportAll,
    /// `export { a } from 'x'`.
    ExportNamed,
}

impl DeclarationKind {
    pub fn is_export(&self) -> bool {
        !matches!(self, DeclarationKind::Import)
    }

    /// Noun used in messages.
    pub fn noun(&self) -> &'static str {
        match self {
            DeclarationKind::Import => "import",
            _ => "export",
        }
    }
}

/// The module specifier a declaration refers to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModuleSource {
    /// A string literal path.
    Literal(String),
    /// Anything a host could not reduce to a literal.
    Dynamic,
}

impl ModuleSource {
    pub fn literal(&self) -> Option<&str> {
        match self {
            ModuleSource::Literal(path) => Some(path),
            ModuleSource::Dynamic => None,
        }
    }
}

/// Kind of an import/export specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecifierKind {
    /// `import foo from 'x'`
    Default,
    /// `import * as ns from 'x'`
    Namespace,
    /// `{ a }`, `{ a as b }`
    Named,
}

/// One binding of a declaration.
///
/// `name` is the name on the source-module side and `alias` the name on this
/// module's side. For `import { a as b }` that is `a`/`b`; for
/// `export { a as b } from 'x'` it is also `a`/`b`. Without `as` both are equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specifier {
    pub kind: SpecifierKind,
    pub name: String,
    pub alias: String,
    /// Inline `type` modifier.
    pub type_only: bool,
    pub range: Option<Span>,
    pub loc: Option<SourceLocation>,
}

/// An import or re-export declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    pub kind: DeclarationKind,
    /// Declaration-level `type` modifier (`import type ...`).
    pub type_only: bool,
    /// `None` only for local exports, which rules ignore.
    pub source: Option<ModuleSource>,
    pub specifiers: Vec<Specifier>,
    pub range: Option<Span>,
    pub loc: Option<SourceLocation>,
}

impl Declaration {
    /// The literal source path, if there is one.
    pub fn source_path(&self) -> Option<&str> {
        self.source.as_ref().and_then(ModuleSource::literal)
    }

    /// Specifiers of kind [`SpecifierKind::Named`], in source order.
    pub fn named_specifiers(&self) -> Vec<&Specifier> {
        self.specifiers
            .iter()
            .filter(|s| s.kind == SpecifierKind::Named)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentKind {
    Line,
    Block,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub kind: CommentKind,
    pub span: Span,
    pub loc: SourceLocation,
}

// ============================================================================
// Ranged access
// ============================================================================

/// A node with an optional byte range and location.
pub trait Ranged {
    /// What to call this node in error messages.
    const WHAT: &'static str;

    fn range(&self) -> Option<Span>;
    fn loc(&self) -> Option<SourceLocation>;

    /// The byte range, or a [`LintError::MissingRange`].
    fn require_range(&self) -> Result<Span, LintError> {
        self.range()
            .ok_or(LintError::MissingRange { what: Self::WHAT })
    }

    /// The location, or a [`LintError::MissingLocation`].
    fn require_loc(&self) -> Result<SourceLocation, LintError> {
        self.loc()
            .ok_or(LintError::MissingLocation { what: Self::WHAT })
    }
}

impl Ranged for Declaration {
    const WHAT: &'static str = "module declaration";

    fn range(&self) -> Option<Span> {
        self.range
    }

    fn loc(&self) -> Option<SourceLocation> {
        self.loc
    }
}

impl Ranged for Specifier {
    const WHAT: &'static str = "specifier";

    fn range(&self) -> Option<Span> {
        self.range
    }

    fn loc(&self) -> Option<SourceLocation> {
        self.loc
    }
}

/// Byte range and location covering the first and last of `nodes`
/// (by start and end offset respectively).
///
/// `nodes` must not be empty.
pub fn extrema<N: Ranged>(nodes: &[&N]) -> Result<(Span, SourceLocation), LintError> {
    let mut first: Option<(Span, SourceLocation)> = None;
    let mut last: Option<(Span, SourceLocation)> = None;
    for node in nodes {
        let range = node.require_range()?;
        let loc = node.require_loc()?;
        if first.is_none_or(|(span, _)| range.start < span.start) {
            first = Some((range, loc));
        }
        if last.is_none_or(|(span, _)| range.end > span.end) {
            last = Some((range, loc));
        }
    }
    match (first, last) {
        (Some((start, start_loc)), Some((end, end_loc))) => Ok((
            Span::new(start.start, end.end.max(start.start)),
            SourceLocation::new(start_loc.start, end_loc.end),
        )),
        _ => Err(LintError::MissingRange { what: N::WHAT }),
    }
}

// ============================================================================
// Program
// ============================================================================

/// What lies between two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gap {
    /// Only whitespace (and allowed punctuation).
    Whitespace,
    /// Whitespace and comments.
    Comments,
    /// Anything else.
    Code,
}

/// Source text plus its module declarations and comments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub text: String,
    /// Module declarations in source order.
    pub body: Vec<Declaration>,
    /// Comments in source order.
    pub comments: Vec<Comment>,
}

impl Program {
    /// Import declarations in source order.
    pub fn imports(&self) -> Vec<&Declaration> {
        self.body
            .iter()
            .filter(|d| d.kind == DeclarationKind::Import)
            .collect()
    }

    /// Re-export declarations (exports with a source) in source order.
    pub fn exports(&self) -> Vec<&Declaration> {
        self.body
            .iter()
            .filter(|d| d.kind.is_export() && d.source.is_some())
            .collect()
    }

    /// Source text of a node.
    pub fn text_of<N: Ranged>(&self, node: &N) -> Result<&str, LintError> {
        let range = node.require_range()?;
        self.slice(range)
    }

    /// Source text of a byte range.
    pub fn slice(&self, span: Span) -> Result<&str, LintError> {
        self.text
            .get(span.start..span.end)
            .ok_or(LintError::MissingRange { what: "source text" })
    }

    /// Classify the text in `span`, ignoring whitespace, comments, and any
    /// character in `allowed`.
    pub fn gap(&self, span: Span, allowed: &[char]) -> Gap {
        let Some(text) = self.text.get(span.start..span.end) else {
            return Gap::Code;
        };
        let mut saw_comment = false;
        let mut skip_until = span.start;
        for (i, ch) in text.char_indices() {
            let offset = span.start + i;
            if offset < skip_until {
                continue;
            }
            if let Some(comment) = self
                .comments
                .iter()
                .find(|c| c.span.start <= offset && offset < c.span.end)
            {
                saw_comment = true;
                skip_until = comment.span.end;
                continue;
            }
            if !ch.is_whitespace() && !allowed.contains(&ch) {
                return Gap::Code;
            }
        }
        if saw_comment {
            Gap::Comments
        } else {
            Gap::Whitespace
        }
    }

    /// Whether only whitespace (and `allowed`) lies between consecutive
    /// `nodes`.
    pub fn only_whitespace_between<N: Ranged>(
        &self,
        nodes: &[&N],
        allowed: &[char],
    ) -> Result<bool, LintError> {
        for pair in nodes.windows(2) {
            let gap = self.between(pair[0], pair[1])?;
            if self.gap(gap, allowed) != Gap::Whitespace {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Byte range strictly between two nodes.
    pub fn between<A: Ranged, B: Ranged>(&self, prev: &A, next: &B) -> Result<Span, LintError> {
        let start = prev.require_range()?.end;
        let end = next.require_range()?.start;
        Ok(Span::new(start, end.max(start)))
    }
}

// ============================================================================
// Tests
// ============================================================================
