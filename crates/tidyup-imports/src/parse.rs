//! Host adapter from the oxc parser to [`Program`].
//!
//! Source text is parsed as a full ECMAScript/TypeScript module; the
//! top-level `import` declarations and re-exports (exports with a `from`
//! clause) become [`Declaration`]s, and every comment is kept with its
//! delimiters. Local exports and all other statements are left out.
//!
//! Any syntax error fails the whole file with [`LintError::Parse`]: rules
//! never run over a partial tree.

use std::path::Path;

use oxc_allocator::Allocator;
use oxc_ast::ast as js;
use oxc_parser::Parser;
use oxc_span::SourceType;
use tidyup_core::patch::Span;
use tidyup_core::text::LineIndex;
use tidyup_core::types::SourceLocation;

use crate::ast::{
    Comment, CommentKind, Declaration, DeclarationKind, ModuleSource, Program, Specifier,
    SpecifierKind,
};
use crate::error::LintError;

/// Parse source text as a TSX module.
pub fn parse(text: &str) -> Result<Program, LintError> {
    parse_as(text, SourceType::tsx())
}

/// Parse source text with the dialect implied by `path`'s extension.
///
/// Unknown extensions fall back to TSX.
pub fn parse_path(path: &Path, text: &str) -> Result<Program, LintError> {
    let source_type = SourceType::from_path(path).unwrap_or_else(|_| SourceType::tsx());
    parse_as(text, source_type)
}

fn parse_as(text: &str, source_type: SourceType) -> Result<Program, LintError> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, text, source_type).parse();

    if let Some(first) = ret.errors.first() {
        if ret.errors.len() > 1 {
            tracing::debug!("{} further syntax errors suppressed", ret.errors.len() - 1);
        }
        return Err(LintError::parse(first.to_string()));
    }
    if ret.panicked {
        return Err(LintError::parse("parser stopped before the end of input"));
    }

    let builder = Builder {
        text,
        index: LineIndex::new(text),
    };
    let body = ret
        .program
        .body
        .iter()
        .filter_map(|statement| builder.declaration(statement))
        .collect();
    let comments = ret
        .program
        .comments
        .iter()
        .map(|comment| builder.comment(comment.span))
        .collect();

    Ok(Program {
        text: text.to_string(),
        body,
        comments,
    })
}

struct Builder<'a> {
    text: &'a str,
    index: LineIndex,
}

impl Builder<'_> {
    fn span(&self, span: oxc_span::Span) -> (Span, SourceLocation) {
        let span = Span::new(span.start as usize, span.end as usize);
        let loc = SourceLocation::new(
            self.index.position(self.text, span.start),
            self.index.position(self.text, span.end),
        );
        (span, loc)
    }

    fn declaration(&self, statement: &js::Statement<'_>) -> Option<Declaration> {
        match statement {
            js::Statement::ImportDeclaration(decl) => {
                let specifiers = decl
                    .specifiers
                    .as_ref()
                    .map(|list| list.iter().map(|s| self.import_specifier(s)).collect())
                    .unwrap_or_default();
                Some(self.build(
                    DeclarationKind::Import,
                    decl.import_kind.is_type(),
                    &decl.source,
                    specifiers,
                    decl.span,
                ))
            }
            js::Statement::ExportAllDeclaration(decl) => Some(self.build(
                DeclarationKind::ExportAll,
                decl.export_kind.is_type(),
                &decl.source,
                Vec::new(),
                decl.span,
            )),
            js::Statement::ExportNamedDeclaration(decl) => {
                let source = decl.source.as_ref()?;
                let specifiers = decl
                    .specifiers
                    .iter()
                    .map(|s| {
                        self.specifier(
                            SpecifierKind::Named,
                            s.local.name().to_string(),
                            s.exported.name().to_string(),
                            s.export_kind.is_type(),
                            s.span,
                        )
                    })
                    .collect();
                Some(self.build(
                    DeclarationKind::ExportNamed,
                    decl.export_kind.is_type(),
                    source,
                    specifiers,
                    decl.span,
                ))
            }
            _ => None,
        }
    }

    fn build(
        &self,
        kind: DeclarationKind,
        type_only: bool,
        source: &js::StringLiteral<'_>,
        specifiers: Vec<Specifier>,
        span: oxc_span::Span,
    ) -> Declaration {
        let (range, loc) = self.span(span);
        Declaration {
            kind,
            type_only,
            source: Some(ModuleSource::Literal(source.value.to_string())),
            specifiers,
            range: Some(range),
            loc: Some(loc),
        }
    }

    fn import_specifier(&self, specifier: &js::ImportDeclarationSpecifier<'_>) -> Specifier {
        match specifier {
            js::ImportDeclarationSpecifier::ImportSpecifier(s) => self.specifier(
                SpecifierKind::Named,
                s.imported.name().to_string(),
                s.local.name.to_string(),
                s.import_kind.is_type(),
                s.span,
            ),
            js::ImportDeclarationSpecifier::ImportDefaultSpecifier(s) => self.specifier(
                SpecifierKind::Default,
                "default".to_string(),
                s.local.name.to_string(),
                false,
                s.span,
            ),
            js::ImportDeclarationSpecifier::ImportNamespaceSpecifier(s) => self.specifier(
                SpecifierKind::Namespace,
                "*".to_string(),
                s.local.name.to_string(),
                false,
                s.span,
            ),
        }
    }

    fn specifier(
        &self,
        kind: SpecifierKind,
        name: String,
        alias: String,
        type_only: bool,
        span: oxc_span::Span,
    ) -> Specifier {
        let (range, loc) = self.span(span);
        Specifier {
            kind,
            name,
            alias,
            type_only,
            range: Some(range),
            loc: Some(loc),
        }
    }

    /// A comment covering its delimiters, whether or not the parser's span
    /// includes them.
    fn comment(&self, span: oxc_span::Span) -> Comment {
        let at = |offset: usize| self.text.get(offset..).unwrap_or("");
        let (mut start, mut end) = (span.start as usize, span.end as usize);
        if !at(start).starts_with("//") && !at(start).starts_with("/*") {
            start = start.saturating_sub(2);
            if at(start).starts_with("/*") {
                end = (end + 2).min(self.text.len());
            }
        }
        let kind = if at(start).starts_with("//") {
            CommentKind::Line
        } else {
            CommentKind::Block
        };
        let (span, loc) = self.span(oxc_span::Span::new(start as u32, end as u32));
        Comment { kind, span, loc }
    }
}

// ============================================================================
// Tests
// ============================================================================
