//! Test suite definitions and the tree runner
//!
//! A suite is a named group of tests with a shell command to invoke them and
//! zero or more child suites. The runner walks the tree depth-first, runs
//! each command as a subprocess, and folds failures upward: a composite is
//! failed exactly when any of its children failed.
//!
//! ## Modules
//!
//! - `suite` - The `Suite` trait, composite nodes, tree runner, reporting
//! - `exec` - Subprocess boundary (`CommandRunner` trait and shell impl)
//! - `python` - Django system suites and bundled-library suites
//! - `js` - JavaScript suites driven by js-test-tool
//! - `i18n` - Translation test suite

pub mod exec;
pub mod i18n;
pub mod js;
pub mod python;
pub mod suite;

pub use exec::{CommandRunner, ShellRunner, SuiteError};
pub use i18n::I18nTestSuite;
pub use js::{JsSuiteKind, JsTestMode, JsTestSuite};
pub use python::{LibTestSuite, PythonTestSuite, SystemKind, SystemTestSuite, lib_suite_dirs};
pub use suite::{CompositeSuite, Suite, SuiteContext, SuiteOutcome, report_failures, run_suite};
