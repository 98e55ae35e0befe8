//! `sort-imports`: sort declarations within runs on consecutive lines, and
//! named specifiers within each declaration.
//!
//! Any line between two declarations (blank, comment or code) ends a run.
//! A run fix re-emits each declaration with its specifiers already sorted,
//! so one application leaves nothing for the specifier fixes to do.

use serde_json::Value;

use crate::ast::{extrema, Declaration, Program, Ranged, Specifier};
use crate::error::LintError;
use crate::options::{InlineTypes, SortOptions, SpecifierKey, TypesInGroup};
use crate::order::{is_identity, partition_stable, sort_by_key, SortKey};
use crate::rule::{Rule, RuleContext};
use crate::rules::SORT_IMPORTS;

#[derive(Debug, Clone)]
pub struct SortImports {
    options: SortOptions,
}

impl SortImports {
    pub fn new(options: SortOptions) -> Self {
        SortImports { options }
    }

    pub fn from_options(value: &Value) -> Result<Self, LintError> {
        SortOptions::from_value(value).map(SortImports::new)
    }

    fn check_declarations(
        &self,
        ctx: &mut RuleContext<'_>,
        decls: &[&Declaration],
    ) -> Result<(), LintError> {
        for run in runs(decls)? {
            self.sort_run(ctx, &run)?;
            for decl in run {
                self.sort_specifiers(ctx, decl)?;
            }
        }
        Ok(())
    }

    fn sort_run(&self, ctx: &mut RuleContext<'_>, run: &[&Declaration]) -> Result<(), LintError> {
        let order = sort_by_key(
            run,
            |decl| match decl.source_path() {
                Some(path) => SortKey::Text(path.to_string()),
                None => SortKey::Missing,
            },
            &self.options.collation,
        );
        let order = self.place_type_declarations(run, order);
        if is_identity(&order) {
            return Ok(());
        }

        let program = ctx.program();
        let texts = order
            .iter()
            .map(|&i| self.sorted_declaration_text(program, run[i]))
            .collect::<Result<Vec<_>, _>>()?;
        ctx.report_range(run, &[], "Expected modules in group to be sorted", texts.join("\n"))
    }

    /// Source text of `decl`, with its specifiers sorted when that fix would
    /// apply on its own.
    fn sorted_declaration_text(
        &self,
        program: &Program,
        decl: &Declaration,
    ) -> Result<String, LintError> {
        let text = program.text_of(decl)?;
        let Some((specifiers, order)) = self.specifier_order(decl) else {
            return Ok(text.to_string());
        };
        if !program.only_whitespace_between(&specifiers, SPECIFIER_SEPARATORS)? {
            return Ok(text.to_string());
        }

        let base = decl.require_range()?.start;
        let (extent, _) = extrema(&specifiers)?;
        let missing = || LintError::MissingRange { what: Specifier::WHAT };
        let head = text
            .get(..extent.start.checked_sub(base).ok_or_else(missing)?)
            .ok_or_else(missing)?;
        let tail = text
            .get(extent.end.checked_sub(base).ok_or_else(missing)?..)
            .ok_or_else(missing)?;
        let sorted = specifier_text(program, &specifiers, &order)?;
        Ok(format!("{head}{sorted}{tail}"))
    }

    fn place_type_declarations(&self, run: &[&Declaration], order: Vec<usize>) -> Vec<usize> {
        let is_type = |i: usize| run[i].type_only;
        let is_value = |i: usize| !run[i].type_only;
        match self.options.types_in_group {
            TypesInGroup::Ignore => order,
            TypesInGroup::Top => partition_stable(&order, is_type),
            TypesInGroup::Bottom => partition_stable(&order, is_value),
            placement @ (TypesInGroup::AboveValue | TypesInGroup::BelowValue) => {
                let mut out = Vec::with_capacity(order.len());
                let mut start = 0;
                while start < order.len() {
                    let source = run[order[start]].source_path();
                    let mut end = start + 1;
                    while end < order.len()
                        && source.is_some()
                        && run[order[end]].source_path() == source
                    {
                        end += 1;
                    }
                    let block = &order[start..end];
                    if placement == TypesInGroup::AboveValue {
                        out.extend(partition_stable(block, is_type));
                    } else {
                        out.extend(partition_stable(block, is_value));
                    }
                    start = end;
                }
                out
            }
        }
    }

    /// Named specifiers of `decl` and their sorted order, or `None` when
    /// they are already in order.
    fn specifier_order<'d>(&self, decl: &'d Declaration) -> Option<(Vec<&'d Specifier>, Vec<usize>)> {
        let specifiers = decl.named_specifiers();
        if specifiers.len() < 2 {
            return None;
        }

        let key = self.options.specifier;
        let order = sort_by_key(
            &specifiers,
            |s| {
                SortKey::Text(match key {
                    SpecifierKey::Source => s.name.clone(),
                    SpecifierKey::Rename => s.alias.clone(),
                })
            },
            &self.options.collation,
        );
        let order = match self.options.inline_types {
            InlineTypes::Ignore => order,
            InlineTypes::Start => partition_stable(&order, |i| specifiers[i].type_only),
            InlineTypes::End => partition_stable(&order, |i| !specifiers[i].type_only),
        };
        (!is_identity(&order)).then_some((specifiers, order))
    }

    fn sort_specifiers(&self, ctx: &mut RuleContext<'_>, decl: &Declaration) -> Result<(), LintError> {
        let Some((specifiers, order)) = self.specifier_order(decl) else {
            return Ok(());
        };
        let code = specifier_text(ctx.program(), &specifiers, &order)?;
        ctx.report_range(
            &specifiers,
            SPECIFIER_SEPARATORS,
            "Expected specifiers to be sorted",
            code,
        )
    }
}

const SPECIFIER_SEPARATORS: &[char] = &[','];

fn specifier_text(
    program: &Program,
    specifiers: &[&Specifier],
    order: &[usize],
) -> Result<String, LintError> {
    let texts = order
        .iter()
        .map(|&i| program.text_of(specifiers[i]))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(texts.join(", "))
}

impl Rule for SortImports {
    fn name(&self) -> &'static str {
        SORT_IMPORTS
    }

    fn check(&self, ctx: &mut RuleContext<'_>) -> Result<(), LintError> {
        let program = ctx.program();
        self.check_declarations(ctx, &program.imports())?;
        if self.options.sort_exports {
            self.check_declarations(ctx, &program.exports())?;
        }
        Ok(())
    }
}

/// Split declarations into runs wherever at least one whole line separates
/// a declaration from the previous one.
fn runs<'p>(decls: &[&'p Declaration]) -> Result<Vec<Vec<&'p Declaration>>, LintError> {
    let mut runs: Vec<Vec<&'p Declaration>> = Vec::new();
    for (i, &decl) in decls.iter().enumerate() {
        let starts_run = match i.checked_sub(1) {
            None => true,
            Some(prev) => {
                let prev_end = decls[prev].require_loc()?.end.line;
                let start = decl.require_loc()?.start.line;
                start.saturating_sub(prev_end) > 1
            }
        };
        if starts_run {
            runs.push(vec![decl]);
        } else if let Some(run) = runs.last_mut() {
            run.push(decl);
        }
    }
    Ok(runs)
}
