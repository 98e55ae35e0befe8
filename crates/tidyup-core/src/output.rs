//! JSON output types and serialization for CLI responses.
//!
//! ## Design Principles
//!
//! 1. **Status first:** Every response has `status` as its first field
//! 2. **Deterministic:** Same input -> same output (files sorted by path,
//!    issues sorted by location)
//! 3. **Versioned:** Schema version in every response

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::error::{OutputErrorCode, TidyError};

pub use crate::types::Location;

/// Current schema version for all responses.
pub const SCHEMA_VERSION: &str = "1";

/// Outcome of linting a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LintOutcome {
    /// No issues were found.
    Valid,
    /// Issues were found and none could be fixed.
    Invalid,
    /// At least one fix was applied.
    Fixed,
}

/// A single reported issue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IssueInfo {
    /// Rule that reported the issue.
    pub rule: String,
    /// Human-readable message.
    pub message: String,
    /// Where the issue was reported.
    pub location: Location,
    /// Whether the issue carries an automatic fix.
    pub fixable: bool,
}

/// Per-file result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    /// File path as given on the command line.
    pub file: String,
    /// Overall outcome.
    pub result: LintOutcome,
    /// Issues found in the original content.
    pub issues: Vec<IssueInfo>,
    /// Issues left after fixing. Equal to `issues.len()` when nothing was
    /// fixed.
    pub remaining: usize,
    /// Rule failures that aborted analysis of this file.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub fatal: Vec<String>,
    /// Whether the file content was rewritten on disk.
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub written: bool,
}

/// Summary counts across all files.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Summary {
    pub files: usize,
    pub issues: usize,
    pub fixable: usize,
    pub remaining: usize,
    pub fixed_files: usize,
    /// Files with at least one aborted rule.
    pub failed_files: usize,
}

impl Summary {
    /// Tally a set of file reports.
    pub fn from_reports(reports: &[FileReport]) -> Self {
        Summary {
            files: reports.len(),
            issues: reports.iter().map(|r| r.issues.len()).sum(),
            fixable: reports
                .iter()
                .flat_map(|r| r.issues.iter())
                .filter(|i| i.fixable)
                .count(),
            remaining: reports.iter().map(|r| r.remaining).sum(),
            fixed_files: reports
                .iter()
                .filter(|r| r.result == LintOutcome::Fixed)
                .count(),
            failed_files: reports.iter().filter(|r| !r.fatal.is_empty()).count(),
        }
    }

    /// Whether anything still needs attention.
    pub fn has_problems(&self) -> bool {
        self.remaining > 0 || self.failed_files > 0
    }
}

/// Response for `tidy check` and `tidy fix`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LintResponse {
    /// Always "ok" for a completed run.
    pub status: String,
    pub schema_version: String,
    /// The command that produced this response.
    pub command: String,
    pub files: Vec<FileReport>,
    pub summary: Summary,
}

impl LintResponse {
    /// Build a response, sorting files by path.
    pub fn new(command: impl Into<String>, mut files: Vec<FileReport>) -> Self {
        files.sort_by(|a, b| a.file.cmp(&b.file));
        for file in &mut files {
            file.issues.sort_by(|a, b| a.location.cmp(&b.location));
        }
        let summary = Summary::from_reports(&files);
        LintResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            command: command.into(),
            files,
            summary,
        }
    }
}

/// Error details for an error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub code: u8,
    pub message: String,
}

/// Response emitted when a command fails outright.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always "error".
    pub status: String,
    pub schema_version: String,
    pub error: ErrorInfo,
}

impl ErrorResponse {
    /// Build an error response from a [`TidyError`].
    pub fn from_error(err: &TidyError) -> Self {
        let code: OutputErrorCode = err.into();
        ErrorResponse {
            status: "error".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            error: ErrorInfo {
                code: code.code(),
                message: err.to_string(),
            },
        }
    }
}

/// Emit a response as pretty-printed JSON to a writer.
pub fn emit_response<T: Serialize>(response: &T, writer: &mut impl Write) -> io::Result<()> {
    let json = serde_json::to_string_pretty(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}

// ============================================================================
// Tests
// ============================================================================
