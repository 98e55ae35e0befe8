//! Binary entry point for the tidy CLI.
//!
//! ## Usage
//!
//! ```bash
//! # Report import grouping and sorting issues
//! tidy check src/
//!
//! # Apply fixes in place
//! tidy fix src/ lib/index.ts
//!
//! # Show what would change without writing
//! tidy fix --dry-run src/
//! ```
//!
//! Output is JSON on stdout; logs go to stderr. Exit status is 0 when every
//! file is clean, 1 when issues remain, and the error code of a
//! `TidyError` when the run itself fails.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use tidyup::cli::{run_check, run_fix};
use tidyup::config::Config;
use tidyup_core::error::{OutputErrorCode, TidyError};
use tidyup_core::output::{emit_response, ErrorResponse, LintResponse};

// ============================================================================
// CLI Structure
// ============================================================================

/// Group and sort imports in JavaScript and TypeScript modules.
#[derive(Parser, Debug)]
#[command(name = "tidy", version, about = "Group and sort ECMAScript imports")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

/// Global arguments shared by all subcommands.
#[derive(Parser, Debug)]
struct GlobalArgs {
    /// Configuration file (default: tidyup.toml in the current directory).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level for tracing output.
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,
}

/// Log level for tracing output.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report issues without changing any file.
    Check {
        /// Files or directories to lint.
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Apply fixes and write changed files.
    Fix {
        /// Files or directories to fix.
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Compute fixes but do not write them.
        #[arg(long)]
        dry_run: bool,
    },
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.global.log_level);

    match execute(cli) {
        Ok(response) => {
            let problems = response.summary.has_problems();
            if let Err(err) = emit_response(&response, &mut io::stdout()) {
                return fail(&TidyError::from(err));
            }
            let _ = io::stdout().flush();
            if problems {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(err) => fail(&err),
    }
}

/// Emit an error response (stdout, JSON) and map it to an exit code.
fn fail(err: &TidyError) -> ExitCode {
    let error_code = OutputErrorCode::from(err);
    let _ = emit_response(&ErrorResponse::from_error(err), &mut io::stdout());
    let _ = io::stdout().flush();
    ExitCode::from(error_code.code())
}

/// Initialize tracing subscriber.
fn init_tracing(level: LogLevel) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn load_config(global: &GlobalArgs) -> Result<Config, TidyError> {
    let config = match &global.config {
        Some(path) => {
            if !path.is_file() {
                return Err(TidyError::file_not_found(path.display().to_string()));
            }
            Config::load(path)?
        }
        None => Config::load_from_root(&std::env::current_dir()?)?,
    };
    Ok(config)
}

/// Execute the CLI command.
fn execute(cli: Cli) -> Result<LintResponse, TidyError> {
    let linter = load_config(&cli.global)?.linter()?;
    match cli.command {
        Command::Check { paths } => run_check(&linter, &paths),
        Command::Fix { paths, dry_run } => run_fix(&linter, &paths, dry_run),
    }
}
