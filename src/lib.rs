//! Tidyup: import grouping and sorting for ECMAScript modules
//!
//! Lint rules that keep `import` and re-export declarations in configured
//! groups and sorted within each group, with automatic fixes, plus the lazy
//! async sequence used by tooling built on top of them.

// Core infrastructure - re-exported from tidyup-core
pub use tidyup_core::error;
pub use tidyup_core::output;
pub use tidyup_core::patch;
pub use tidyup_core::text;
pub use tidyup_core::types;

// Lint rules - re-exported from tidyup-imports
pub use tidyup_imports as imports;
pub use tidyup_imports::{Issue, LintError, LintReport, Linter, Rule};

// Async sequences - re-exported from tidyup-seq
pub use tidyup_seq as seq;
pub use tidyup_seq::AsyncArray;

// Configuration file support
pub mod config;

// Front door
pub mod cli;
