//! Core infrastructure for tidyup.
//!
//! This crate provides the language-agnostic pieces shared by the lint rules
//! and the CLI:
//! - Byte spans and text edits with conflict detection (`patch`)
//! - Byte offset and line:column conversions (`text`)
//! - Source positions and file locations (`types`)
//! - Error types and stable error codes (`error`)
//! - JSON report types for CLI responses (`output`)

pub mod error;
pub mod output;
pub mod patch;
pub mod text;
pub mod types;
