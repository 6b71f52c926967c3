#![forbid(unsafe_code)]
//! Proctor: build and test orchestration for the campus web platform
//!
//! Two independent concerns live in this crate:
//!
//! - **Test tasks** (`cli`, `suites`, `coverage`): a CLI that composes the
//!   platform's test suites into a tree, runs each suite's shell command as a
//!   subprocess, and aggregates pass/fail bottom-up. Coverage reports are
//!   built from the artifacts those runs leave behind.
//! - **Stub comments service** (`stub`): an HTTP stand-in for the discussion
//!   backend that serves pre-configured JSON fixtures, so acceptance tests
//!   can run without the real service.
//!
//! ## Panic Policy
//!
//! Production code returns `Result` and propagates with `?`. The `cli` module
//! enforces `#![deny(clippy::unwrap_used)]`; `.unwrap()` and `.expect()` are
//! acceptable in tests only.

pub mod cli;
pub mod coverage;
pub mod env;
pub mod stub;
pub mod suites;
pub mod version;

pub use env::Env;
pub use suites::exec::{CommandRunner, ShellRunner, SuiteError};
pub use suites::suite::{CompositeSuite, Suite, SuiteContext, SuiteOutcome, run_suite};
