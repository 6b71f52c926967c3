//! Task implementations
//!
//! Each task composes a suite tree, runs it with the shell runner, and
//! reports the failure list. All functions return `CliResult<ExitCode>`;
//! error printing and exits happen in the top-level `run()`.

use crate::coverage;
use crate::env::Env;
use crate::suites::{
    CompositeSuite, I18nTestSuite, JsSuiteKind, JsTestMode, JsTestSuite, LibTestSuite,
    PythonTestSuite, ShellRunner, Suite, SuiteContext, SystemKind, SystemTestSuite,
    lib_suite_dirs, report_failures, run_suite,
};

use super::{CliError, CliResult, ExitCode};

fn suite_context() -> CliResult<SuiteContext> {
    let env = Env::from_current_dir()
        .map_err(|e| CliError::failure(format!("Cannot resolve repository root: {e}")))?;
    Ok(SuiteContext::new(env))
}

/// Run a composed tree and fold its outcome into the exit code.
fn run_and_report(suite: &dyn Suite, ctx: &SuiteContext) -> CliResult<ExitCode> {
    let runner = ShellRunner;
    let outcome = run_suite(suite, ctx, &runner);
    report_failures(&outcome);

    // The failure list is the whole message; nothing further to print
    if outcome.failed {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// The Python composite: both systems plus every bundled library.
fn python_suite(ctx: &SuiteContext) -> CliResult<PythonTestSuite> {
    let mut children: Vec<Box<dyn Suite>> = SystemKind::ALL
        .into_iter()
        .map(|system| Box::new(SystemTestSuite::new(system)) as Box<dyn Suite>)
        .collect();

    let lib_dirs = lib_suite_dirs(&ctx.env)
        .map_err(|e| CliError::failure(format!("Cannot list bundled libraries: {e}")))?;
    children.extend(
        lib_dirs
            .into_iter()
            .map(|dir| Box::new(LibTestSuite::new(dir)) as Box<dyn Suite>),
    );

    Ok(PythonTestSuite::new("python tests", children))
}

/// Run everything: python, i18n, and javascript.
pub fn run_all_tests() -> CliResult<ExitCode> {
    let ctx = suite_context()?;
    let root = CompositeSuite::new(
        "all tests",
        vec![
            Box::new(python_suite(&ctx)?) as Box<dyn Suite>,
            Box::new(I18nTestSuite),
            Box::new(JsTestSuite::new(None, JsTestMode::Run)),
        ],
    );
    run_and_report(&root, &ctx)
}

/// Run one system's Django tests.
pub fn run_system_tests(
    system: &str,
    test_id: Option<String>,
    failed_only: bool,
    fail_fast: bool,
    fasttest: bool,
) -> CliResult<ExitCode> {
    let ctx = suite_context()?;
    let system: SystemKind = system.parse().map_err(CliError::failure)?;

    let suite = SystemTestSuite::new(system)
        .with_test_id(test_id)
        .failed_only(failed_only)
        .fail_fast(fail_fast)
        .fasttest(fasttest);
    let tree = PythonTestSuite::new(
        format!("{system} python tests"),
        vec![Box::new(suite) as Box<dyn Suite>],
    );
    run_and_report(&tree, &ctx)
}

/// Run one bundled library's tests.
pub fn run_lib_tests(
    lib: String,
    test_id: Option<String>,
    failed_only: bool,
    fail_fast: bool,
) -> CliResult<ExitCode> {
    let ctx = suite_context()?;

    let name = format!("{lib} python tests");
    let suite = LibTestSuite::new(lib)
        .with_test_id(test_id)
        .failed_only(failed_only)
        .fail_fast(fail_fast);
    let tree = PythonTestSuite::new(name, vec![Box::new(suite) as Box<dyn Suite>]);
    run_and_report(&tree, &ctx)
}

/// Run all Python suites.
pub fn run_python_tests() -> CliResult<ExitCode> {
    let ctx = suite_context()?;
    let suite = python_suite(&ctx)?;
    run_and_report(&suite, &ctx)
}

/// Run the translation checks.
pub fn run_i18n_tests() -> CliResult<ExitCode> {
    let ctx = suite_context()?;
    run_and_report(&I18nTestSuite, &ctx)
}

/// Run JavaScript suites, headless or in the browser.
pub fn run_js_tests(suite: Option<&str>, dev: bool, coverage: bool) -> CliResult<ExitCode> {
    let ctx = suite_context()?;

    let kind = match suite {
        Some(name) => Some(name.parse::<JsSuiteKind>().map_err(CliError::failure)?),
        None => None,
    };

    if kind.is_none() {
        if dev {
            // Browser mode opens one suite at a time
            println!("Error: No test suite specified. Try one of these instead:");
            crate::suites::js::print_available_suites(JsTestMode::Dev);
            return Err(CliError::failure(""));
        }
        println!("Running all test suites. To run a specific test suite, try:");
        crate::suites::js::print_available_suites(JsTestMode::Run);
    }

    let mode = if dev { JsTestMode::Dev } else { JsTestMode::Run };
    let js = JsTestSuite::new(kind, mode).with_coverage(coverage);
    run_and_report(&js, &ctx)
}

/// Build the html, xml, and diff coverage reports from a previous run.
pub fn build_coverage_reports() -> CliResult<ExitCode> {
    let ctx = suite_context()?;
    let runner = ShellRunner;
    coverage::build_reports(&ctx.env, &runner).map_err(|e| CliError::failure(e.to_string()))?;
    Ok(ExitCode::SUCCESS)
}
