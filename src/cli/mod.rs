//! CLI module for the proctor task runner
//!
//! ## Commands
//!
//! - `test` - Run every suite (python + i18n + javascript)
//! - `system` - One system's Django tests (lms or cms)
//! - `lib` - One bundled library's tests
//! - `python` - All Python suites
//! - `i18n` - The translation checks
//! - `js` - JavaScript suites (headless or in-browser)
//! - `coverage` - Build coverage reports from a previous run
//!
//! ## Design
//!
//! Argument parsing uses clap with derive macros. Command functions return
//! `CliResult<ExitCode>` instead of calling `process::exit`; only the
//! top-level `run()` prints errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::process;

use clap::{Parser, Subcommand};

use crate::version::PROCTOR_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Carries a user-facing message and the exit code the shell sees. An empty
/// message exits silently (used when the output already said everything).
#[derive(Debug)]
pub struct CliError {
    pub message: String,
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            exit_code: ExitCode::FAILURE,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Test orchestration tasks for the campus web platform
#[derive(Parser, Debug)]
#[command(name = "proctor")]
#[command(version = PROCTOR_VERSION)]
#[command(about = "Test orchestration tasks for the campus web platform", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run every test suite
    Test,

    /// Run one system's Django tests
    System {
        /// System to act on
        #[arg(short = 's', long, default_value = "lms")]
        system: String,
        /// Run only the listed test ids
        #[arg(short = 't', long = "test-id", value_name = "ID")]
        test_id: Option<String>,
        /// Re-run only the tests that failed last time
        #[arg(short = 'f', long)]
        failed: bool,
        /// Stop on the first failure
        #[arg(short = 'x', long = "fail-fast")]
        fail_fast: bool,
        /// Skip the static asset rebuild
        #[arg(short = 'a', long)]
        fasttest: bool,
    },

    /// Run one bundled library's tests
    Lib {
        /// Library directory to test (e.g. common/lib/capa)
        #[arg(short = 'l', long, value_name = "DIR")]
        lib: String,
        /// Run only the listed test ids
        #[arg(short = 't', long = "test-id", value_name = "ID")]
        test_id: Option<String>,
        /// Re-run only the tests that failed last time
        #[arg(short = 'f', long)]
        failed: bool,
        /// Stop on the first failure
        #[arg(short = 'x', long = "fail-fast")]
        fail_fast: bool,
    },

    /// Run all Python suites
    Python,

    /// Run the translation checks
    I18n,

    /// Run JavaScript suites
    Js {
        /// Test suite to run (lms, cms, cms-squire, xmodule, common)
        #[arg(short = 's', long)]
        suite: Option<String>,
        /// Open the suite in the default browser instead of running headless
        #[arg(long)]
        dev: bool,
        /// Collect coverage information (headless runs only)
        #[arg(long)]
        coverage: bool,
    },

    /// Build the html, xml, and diff coverage reports
    Coverage,
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{e}");
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Test => commands::run_all_tests(),
        Command::System {
            system,
            test_id,
            failed,
            fail_fast,
            fasttest,
        } => commands::run_system_tests(&system, test_id, failed, fail_fast, fasttest),
        Command::Lib {
            lib,
            test_id,
            failed,
            fail_fast,
        } => commands::run_lib_tests(lib, test_id, failed, fail_fast),
        Command::Python => commands::run_python_tests(),
        Command::I18n => commands::run_i18n_tests(),
        Command::Js {
            suite,
            dev,
            coverage,
        } => commands::run_js_tests(suite.as_deref(), dev, coverage),
        Command::Coverage => commands::build_coverage_reports(),
    }
}

// ============================================================================
// Tests
// ============================================================================
