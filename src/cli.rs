//! CLI front door.
//!
//! Helpers behind the `tidy` binary:
//! - `check` - lint files and report issues
//! - `fix` - lint files, apply fixes, and write the results back
//!
//! Both walk the given paths for ECMAScript sources and return a
//! [`LintResponse`] ready to be emitted as JSON. A file that cannot be read or
//! parsed is reported with a fatal entry rather than aborting the run.
//!
//! ## Error Handling
//!
//! All functions return `Result<T, TidyError>`. Missing paths map to
//! `FileNotFound`, write failures to `ApplyError`.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use tidyup_core::error::TidyError;
use tidyup_core::output::{FileReport, IssueInfo, LintOutcome, LintResponse, Location};
use tidyup_imports::lint::{FatalMessage, LintReport};
use tidyup_imports::{Issue, Linter};

/// Extensions of files picked up when walking directories.
pub const SOURCE_EXTENSIONS: &[&str] = &["js", "mjs", "cjs", "jsx", "ts", "mts", "cts", "tsx"];

/// Directory names never descended into.
const SKIPPED_DIRS: &[&str] = &["node_modules", "dist", "build", "coverage"];

// ============================================================================
// File Collection
// ============================================================================

fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || SKIPPED_DIRS.iter().any(|skipped| name == *skipped)
}

/// Expand `paths` into the source files to lint.
///
/// Files named explicitly are always included. Directories are walked for
/// files with a [`SOURCE_EXTENSIONS`] extension, skipping hidden directories
/// and [`SKIPPED_DIRS`]. The result is sorted and free of duplicates.
pub fn collect_source_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>, TidyError> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            files.push(path.clone());
            continue;
        }
        if !path.is_dir() {
            return Err(TidyError::file_not_found(path.display().to_string()));
        }
        for entry in WalkDir::new(path)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| !is_skipped_dir(e))
            .filter_map(|e| e.map_err(|err| warn!("skipping unreadable entry: {err}")).ok())
        {
            if entry.file_type().is_file() && is_source_file(entry.path()) {
                files.push(entry.into_path());
            }
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

// ============================================================================
// Report Conversion
// ============================================================================

fn issue_info(file: &str, issue: &Issue) -> IssueInfo {
    IssueInfo {
        rule: issue.rule.to_string(),
        message: issue.message.clone(),
        location: Location::range(file, issue.loc, issue.span),
        fixable: issue.is_fixable(),
    }
}

fn fatal_info(fatal: &[FatalMessage]) -> Vec<String> {
    fatal
        .iter()
        .map(|f| format!("{}: {}", f.rule, f.error))
        .collect()
}

fn unreadable(file: String, reason: String) -> FileReport {
    FileReport {
        file,
        result: LintOutcome::Invalid,
        issues: vec![],
        remaining: 0,
        fatal: vec![reason],
        written: false,
    }
}

// ============================================================================
// Commands
// ============================================================================

/// Lint one file without changing it.
pub fn check_file(linter: &Linter, path: &Path) -> Result<FileReport, TidyError> {
    let file = path.display().to_string();
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => return Ok(unreadable(file, format!("read: {err}"))),
    };
    let verification = match linter.verify_path(path, &content) {
        Ok(verification) => verification,
        Err(err) => return Ok(unreadable(file, format!("parse: {err}"))),
    };

    let result = if verification.is_clean() {
        LintOutcome::Valid
    } else {
        LintOutcome::Invalid
    };
    debug!(file = %file, issues = verification.issues.len(), "checked");
    Ok(FileReport {
        result,
        issues: verification.issues.iter().map(|i| issue_info(&file, i)).collect(),
        remaining: verification.issues.len(),
        fatal: fatal_info(&verification.fatal),
        written: false,
        file,
    })
}

/// Lint one file and apply fixes, writing the file unless `dry_run`.
pub fn fix_file(linter: &Linter, path: &Path, dry_run: bool) -> Result<FileReport, TidyError> {
    let file = path.display().to_string();
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => return Ok(unreadable(file, format!("read: {err}"))),
    };
    let report: LintReport = match linter.verify_and_fix_path(path, &content) {
        Ok(report) => report,
        Err(err) => return Ok(unreadable(file, format!("parse: {err}"))),
    };

    let written = report.result == LintOutcome::Fixed && !dry_run;
    if written {
        fs::write(path, &report.output).map_err(|e| TidyError::ApplyError {
            message: e.to_string(),
            file: Some(file.clone()),
        })?;
    }
    debug!(
        file = %file,
        passes = report.passes,
        remaining = report.remaining.len(),
        written,
        "fixed"
    );
    Ok(FileReport {
        result: report.result,
        issues: report.issues.iter().map(|i| issue_info(&file, i)).collect(),
        remaining: report.remaining.len(),
        fatal: fatal_info(&report.fatal),
        written,
        file,
    })
}

/// `tidy check`.
pub fn run_check(linter: &Linter, paths: &[PathBuf]) -> Result<LintResponse, TidyError> {
    let files = collect_source_files(paths)?;
    info!(files = files.len(), "checking");
    let reports = files
        .iter()
        .map(|path| check_file(linter, path))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(LintResponse::new("check", reports))
}

/// `tidy fix`.
pub fn run_fix(
    linter: &Linter,
    paths: &[PathBuf],
    dry_run: bool,
) -> Result<LintResponse, TidyError> {
    let files = collect_source_files(paths)?;
    info!(files = files.len(), dry_run, "fixing");
    let reports = files
        .iter()
        .map(|path| fix_file(linter, path, dry_run))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(LintResponse::new("fix", reports))
}

// ============================================================================
// Tests
// ============================================================================
