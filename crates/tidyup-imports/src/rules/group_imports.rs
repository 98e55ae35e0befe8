//! `group-imports`: bucket declarations into configured groups, keep the
//! groups in order and separate them by exactly one blank line.

use serde_json::Value;
use tidyup_core::patch::{Span, TextEdit};

use crate::ast::{Declaration, Gap, Program};
use crate::collate::CollationOptions;
use crate::error::LintError;
use crate::options::GroupOptions;
use crate::order::{is_identity, sort_by_key, SortKey};
use crate::rule::{Rule, RuleContext};
use crate::rules::GROUP_IMPORTS;

#[derive(Debug, Clone)]
pub struct GroupImports {
    options: GroupOptions,
}

impl GroupImports {
    pub fn new(options: GroupOptions) -> Self {
        GroupImports { options }
    }

    pub fn from_options(value: &Value) -> Result<Self, LintError> {
        GroupOptions::from_value(value).map(GroupImports::new)
    }

    fn check_declarations(
        &self,
        ctx: &mut RuleContext<'_>,
        decls: &[&Declaration],
    ) -> Result<(), LintError> {
        let Some(first) = decls.first() else {
            return Ok(());
        };
        let noun = first.kind.noun();
        let indices: Vec<usize> = decls.iter().map(|d| self.options.group_index(d)).collect();
        let order = sort_by_key(&indices, |&i| SortKey::Number(i), &CollationOptions::default());

        if !is_identity(&order) {
            let program = ctx.program();
            let mut code = String::new();
            for (pos, &i) in order.iter().enumerate() {
                if pos > 0 {
                    let same_group = indices[order[pos - 1]] == indices[i];
                    code.push_str(if same_group { "\n" } else { "\n\n" });
                }
                code.push_str(program.text_of(decls[i])?);
            }
            let message = format!("Expected {noun} groups: {}", self.options.labels());
            return ctx.report_range(decls, &[], message, code);
        }

        for (i, pair) in decls.windows(2).enumerate() {
            let expected = if indices[i] == indices[i + 1] { 0 } else { 1 };
            check_spacing(ctx, pair[0], pair[1], expected)?;
        }
        Ok(())
    }
}

impl Rule for GroupImports {
    fn name(&self) -> &'static str {
        GROUP_IMPORTS
    }

    fn check(&self, ctx: &mut RuleContext<'_>) -> Result<(), LintError> {
        let program = ctx.program();
        self.check_declarations(ctx, &program.imports())?;
        if self.options.exports {
            self.check_declarations(ctx, &program.exports())?;
        }
        Ok(())
    }
}

/// Require exactly `expected` blank lines between two declarations.
///
/// Comments in between are kept byte for byte and never count as blank, even
/// when a block comment spans empty lines. Code in between makes the issue
/// unfixable.
fn check_spacing(
    ctx: &mut RuleContext<'_>,
    prev: &Declaration,
    next: &Declaration,
    expected: usize,
) -> Result<(), LintError> {
    let program = ctx.program();
    let span = program.between(prev, next)?;
    let text = program.slice(span)?;
    let gap = program.gap(span, &[]);
    let comments = comments_within(program, span);
    let lines = gap_lines(text, &comments);

    if gap != Gap::Code && blank_lines(&lines) == expected {
        return Ok(());
    }

    let message = format!(
        "Expected {expected} empty line{} after {}",
        if expected == 1 { "" } else { "s" },
        prev.kind.noun()
    );
    let fix = match gap {
        Gap::Code => None,
        Gap::Whitespace | Gap::Comments => Some(TextEdit::replace(span, respace(&lines, expected))),
    };
    ctx.report_node(prev, message, fix)
}

/// One line of the text between two declarations. A newline inside a block
/// comment does not end a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct GapLine<'a> {
    text: &'a str,
    /// Length of the prefix that ends with comment text.
    protected: usize,
}

impl<'a> GapLine<'a> {
    fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// The line without trailing whitespace outside comments.
    fn trim_end(&self) -> &'a str {
        let end = self.text.trim_end().len().max(self.protected);
        &self.text[..end]
    }
}

/// Comment byte ranges inside `span`, relative to its start.
fn comments_within(program: &Program, span: Span) -> Vec<(usize, usize)> {
    program
        .comments
        .iter()
        .filter(|c| c.span.start < span.end && c.span.end > span.start)
        .map(|c| {
            (
                c.span.start.saturating_sub(span.start),
                c.span.end.min(span.end) - span.start,
            )
        })
        .collect()
}

fn gap_lines<'a>(text: &'a str, comments: &[(usize, usize)]) -> Vec<GapLine<'a>> {
    let inside = |i: usize| comments.iter().any(|&(start, end)| start <= i && i < end);
    let mut bounds = Vec::new();
    let mut from = 0;
    for (i, _) in text.match_indices('\n') {
        if !inside(i) {
            bounds.push((from, i));
            from = i + 1;
        }
    }
    bounds.push((from, text.len()));

    bounds
        .into_iter()
        .map(|(from, to)| {
            let protected = comments
                .iter()
                .filter(|&&(start, end)| start < to && end > from)
                .map(|&(_, end)| end.min(to) - from)
                .max()
                .unwrap_or(0);
            GapLine {
                text: &text[from..to],
                protected,
            }
        })
        .collect()
}

/// Empty lines strictly inside a gap. The rest of the line the gap starts on
/// and the start of the line it ends on never count.
fn blank_lines(lines: &[GapLine<'_>]) -> usize {
    match lines {
        [_, middle @ .., _] => middle.iter().filter(|l| l.is_blank()).count(),
        _ => 0,
    }
}

/// Rewrite the text between two declarations so exactly `blank_lines` empty
/// lines follow the first one. Comments are kept, each on its own line.
fn respace(lines: &[GapLine<'_>], blank_lines: usize) -> String {
    let head = lines.first().map_or("", GapLine::trim_end);
    let (middle, tail) = match lines {
        [_, middle @ .., last] => (middle, last.text.trim_start()),
        _ => (&[][..], ""),
    };

    let mut out = String::from(head);
    out.push_str(&"\n".repeat(blank_lines + 1));
    for line in middle.iter().filter(|l| !l.is_blank()) {
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out.push_str(tail);
    out
}
