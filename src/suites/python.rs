//! Django system suites and bundled-library suites
//!
//! Two leaf shapes run the platform's Python tests:
//!
//! - `SystemTestSuite` drives `./manage.py <system> test` for the `lms` and
//!   `cms` applications.
//! - `LibTestSuite` drives `nosetests` for one directory under `common/lib`.
//!
//! Both run under coverage by default, wrapped with `python -m coverage` so
//! the interpreter's own importable coverage is used rather than whatever
//! the OS path finds first.

use std::fs;
use std::io;
use std::str::FromStr;

use super::exec::SuiteError;
use super::suite::{Suite, SuiteContext};
use crate::env::{self, Env};

// ============================================================================
// Shared command pieces
// ============================================================================

/// Wrap a command for coverage collection.
///
/// `rcfile_dir` is the suite's directory relative to the repo root; each
/// suite carries its own `.coveragerc` so data files land beside it.
fn python_coverage_cmd(cmd: &str, rcfile_dir: &str) -> String {
    match cmd.split_once(' ') {
        Some((argv0, rest)) => {
            format!("python -m coverage run --rcfile={rcfile_dir}/.coveragerc `which {argv0}` {rest}")
        }
        None => format!("python -m coverage run --rcfile={rcfile_dir}/.coveragerc `which {cmd}`"),
    }
}

/// Options shared by the nose-style runners.
///
/// `--failed` re-runs only the tests recorded as failing in the id file;
/// `--stop` aborts on the first failure, requested per-invocation or via the
/// `TESTS_FAIL_FAST` environment variable.
fn nose_option_flags(failed_only: bool, fail_fast: bool) -> Vec<&'static str> {
    let mut opts = Vec::new();
    if failed_only {
        opts.push("--failed");
    }
    if fail_fast || fail_fast_requested_by_env() {
        opts.push("--stop");
    }
    opts
}

fn fail_fast_requested_by_env() -> bool {
    std::env::var_os("TESTS_FAIL_FAST").is_some_and(|v| !v.is_empty())
}

// ============================================================================
// System suites (lms / cms)
// ============================================================================

/// The Django applications that carry a test suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemKind {
    Lms,
    Cms,
}

impl SystemKind {
    pub const ALL: [SystemKind; 2] = [SystemKind::Cms, SystemKind::Lms];

    pub fn as_str(self) -> &'static str {
        match self {
            SystemKind::Lms => "lms",
            SystemKind::Cms => "cms",
        }
    }
}

impl FromStr for SystemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lms" => Ok(SystemKind::Lms),
            "cms" => Ok(SystemKind::Cms),
            other => Err(format!("unknown system '{other}' (expected lms or cms)")),
        }
    }
}

impl std::fmt::Display for SystemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Suite for one system's Django tests.
pub struct SystemTestSuite {
    system: SystemKind,
    test_id: Option<String>,
    failed_only: bool,
    fail_fast: bool,
    fasttest: bool,
    with_coverage: bool,
}

impl SystemTestSuite {
    pub fn new(system: SystemKind) -> Self {
        Self {
            system,
            test_id: None,
            failed_only: false,
            fail_fast: false,
            fasttest: false,
            with_coverage: true,
        }
    }

    pub fn with_test_id(mut self, test_id: Option<String>) -> Self {
        self.test_id = test_id;
        self
    }

    pub fn failed_only(mut self, yes: bool) -> Self {
        self.failed_only = yes;
        self
    }

    pub fn fail_fast(mut self, yes: bool) -> Self {
        self.fail_fast = yes;
        self
    }

    pub fn fasttest(mut self, yes: bool) -> Self {
        self.fasttest = yes;
        self
    }

    pub fn with_coverage(mut self, yes: bool) -> Self {
        self.with_coverage = yes;
        self
    }

    /// With no explicit test id, limit the runner to our own apps.
    ///
    /// `dir/*` rather than `dir` makes the runner import the packages early,
    /// picking up models that are only defined in test modules.
    fn default_test_id(&self) -> String {
        let system = self.system.as_str();
        let mut test_id = format!("{system}/djangoapps/* common/djangoapps/* {system}/lib/*");
        if self.system == SystemKind::Lms {
            test_id.push_str(" lms/tests.py");
        }
        test_id
    }
}

impl Suite for SystemTestSuite {
    fn name(&self) -> &str {
        self.system.as_str()
    }

    fn cmd(&self, _ctx: &SuiteContext) -> Option<String> {
        let test_id = self
            .test_id
            .clone()
            .unwrap_or_else(|| self.default_test_id());

        let mut parts = vec![
            "./manage.py".to_string(),
            self.system.as_str().to_string(),
            "test".to_string(),
            test_id,
        ];
        parts.extend(
            nose_option_flags(self.failed_only, self.fail_fast)
                .into_iter()
                .map(String::from),
        );
        parts.push("--traceback".to_string());
        parts.push("--settings=test".to_string());

        Some(parts.join(" "))
    }

    fn runs_under_coverage(&self) -> bool {
        self.with_coverage
    }

    fn coverage_cmd(&self, cmd: &str, _ctx: &SuiteContext) -> String {
        python_coverage_cmd(cmd, self.system.as_str())
    }

    fn set_up(&self, ctx: &SuiteContext) -> Result<(), SuiteError> {
        let name = self.name();
        let wrap = |source: io::Error| SuiteError::SetUp {
            suite: name.to_string(),
            source,
        };

        // Fresh report dir; the test-id dir persists so --failed keeps working
        env::clean_dir(ctx.env.suite_report_dir(name)).map_err(wrap)?;
        env::get_or_make_dir(ctx.env.suite_test_id_dir(name)).map_err(wrap)?;
        env::clean_test_files(&ctx.env).map_err(wrap)?;

        // Static assets are compiled by the web application's own pipeline
        if self.fasttest {
            tracing::debug!(system = name, "fasttest: skipping asset rebuild");
        }
        Ok(())
    }
}

// ============================================================================
// Bundled-library suites (common/lib/*)
// ============================================================================

/// Suite for one bundled library directory under `common/lib`.
pub struct LibTestSuite {
    lib_dir: String,
    test_id: Option<String>,
    failed_only: bool,
    fail_fast: bool,
    with_coverage: bool,
}

impl LibTestSuite {
    pub fn new(lib_dir: impl Into<String>) -> Self {
        Self {
            lib_dir: lib_dir.into(),
            test_id: None,
            failed_only: false,
            fail_fast: false,
            with_coverage: true,
        }
    }

    pub fn with_test_id(mut self, test_id: Option<String>) -> Self {
        self.test_id = test_id;
        self
    }

    pub fn failed_only(mut self, yes: bool) -> Self {
        self.failed_only = yes;
        self
    }

    pub fn fail_fast(mut self, yes: bool) -> Self {
        self.fail_fast = yes;
        self
    }

    pub fn with_coverage(mut self, yes: bool) -> Self {
        self.with_coverage = yes;
        self
    }

    fn noseids_path(&self, ctx: &SuiteContext) -> std::path::PathBuf {
        ctx.env.suite_test_id_dir(&self.lib_dir).join("noseids")
    }
}

impl Suite for LibTestSuite {
    fn name(&self) -> &str {
        &self.lib_dir
    }

    fn cmd(&self, ctx: &SuiteContext) -> Option<String> {
        let test_id = self.test_id.as_deref().unwrap_or(&self.lib_dir);

        let mut parts = vec![
            "nosetests".to_string(),
            format!("--id-file={}", self.noseids_path(ctx).display()),
            test_id.to_string(),
        ];
        parts.extend(
            nose_option_flags(self.failed_only, self.fail_fast)
                .into_iter()
                .map(String::from),
        );

        Some(parts.join(" "))
    }

    fn runs_under_coverage(&self) -> bool {
        self.with_coverage
    }

    fn coverage_cmd(&self, cmd: &str, _ctx: &SuiteContext) -> String {
        python_coverage_cmd(cmd, &self.lib_dir)
    }

    fn extra_env(&self, ctx: &SuiteContext) -> Vec<(String, String)> {
        // Point nose's xunit output into the suite's report dir
        let xunit = ctx.env.suite_report_dir(&self.lib_dir).join("nosetests.xml");
        vec![("NOSE_XUNIT_FILE".to_string(), xunit.display().to_string())]
    }

    fn set_up(&self, ctx: &SuiteContext) -> Result<(), SuiteError> {
        let name = self.name();
        let wrap = |source: io::Error| SuiteError::SetUp {
            suite: name.to_string(),
            source,
        };

        env::get_or_make_dir(ctx.env.suite_report_dir(name)).map_err(wrap)?;
        env::get_or_make_dir(ctx.env.suite_test_id_dir(name)).map_err(wrap)?;
        env::clean_test_files(&ctx.env).map_err(wrap)?;
        Ok(())
    }
}

// ============================================================================
// Composite
// ============================================================================

/// Composite over the system and library suites.
pub struct PythonTestSuite {
    name: String,
    children: Vec<Box<dyn Suite>>,
}

impl PythonTestSuite {
    pub fn new(name: impl Into<String>, children: Vec<Box<dyn Suite>>) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }
}

impl Suite for PythonTestSuite {
    fn name(&self) -> &str {
        &self.name
    }

    fn children(&self) -> &[Box<dyn Suite>] {
        &self.children
    }

    fn set_up(&self, ctx: &SuiteContext) -> Result<(), SuiteError> {
        let wrap = |source: io::Error| SuiteError::SetUp {
            suite: self.name.clone(),
            source,
        };

        // One wipe of the reports root per run, before any child writes
        env::clean_test_files(&ctx.env).map_err(wrap)?;
        env::clean_reports_dir(&ctx.env).map_err(wrap)?;
        Ok(())
    }
}

/// List the bundled library directories under `common/lib`, one suite each.
///
/// A checkout without `common/lib` yields no suites rather than an error, so
/// the composite tasks stay usable in partial workspaces.
pub fn lib_suite_dirs(env: &Env) -> io::Result<Vec<String>> {
    let lib_root = env.repo_root.join("common/lib");
    let mut dirs = Vec::new();

    if !lib_root.is_dir() {
        tracing::warn!(path = %lib_root.display(), "no bundled libraries found");
        return Ok(dirs);
    }

    for entry in fs::read_dir(&lib_root)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            if let Some(name) = entry.file_name().to_str() {
                dirs.push(format!("common/lib/{name}"));
            }
        }
    }

    dirs.sort();
    Ok(dirs)
}

// ============================================================================
// Tests
// ============================================================================
