//! Import organizer lint rules.
//!
//! Two rules operate over the import/export declarations of one module:
//! - `group-imports`: buckets declarations into configured groups, then
//!   checks group order and blank-line spacing
//! - `sort-imports`: sorts declarations within runs on consecutive lines,
//!   and specifiers within each declaration
//!
//! The rules consume a [`ast::Program`] handed over by a host. The [`parse`]
//! module builds one from source text with the oxc parser, and
//! [`lint::Linter`] drives rules and applies fixes until a fixpoint.

pub mod ast;
pub mod classify;
pub mod collate;
pub mod error;
pub mod lint;
pub mod options;
pub mod order;
pub mod parse;
pub mod rule;
pub mod rules;

pub use error::LintError;
pub use lint::{LintReport, Linter};
pub use rule::{Issue, Rule};
