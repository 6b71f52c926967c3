//! JavaScript suites driven by js-test-tool
//!
//! Each frontend area ships a suite description YAML; the runner takes one
//! description (or all of them) plus a mode: `run` prints results to the
//! console, `dev` opens the suite in a browser and leaves it there.

use std::fmt;
use std::io;
use std::str::FromStr;

use super::exec::SuiteError;
use super::suite::{Suite, SuiteContext};
use crate::env;

/// Seconds before js-test-tool gives up on a suite.
const JS_TIMEOUT_SEC: u32 = 600;

/// The frontend areas that ship a suite description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsSuiteKind {
    Lms,
    Cms,
    CmsSquire,
    Xmodule,
    Common,
}

impl JsSuiteKind {
    pub const ALL: [JsSuiteKind; 5] = [
        JsSuiteKind::Lms,
        JsSuiteKind::Cms,
        JsSuiteKind::CmsSquire,
        JsSuiteKind::Xmodule,
        JsSuiteKind::Common,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            JsSuiteKind::Lms => "lms",
            JsSuiteKind::Cms => "cms",
            JsSuiteKind::CmsSquire => "cms-squire",
            JsSuiteKind::Xmodule => "xmodule",
            JsSuiteKind::Common => "common",
        }
    }

    /// Suite description path relative to the repo root.
    pub fn config_path(self) -> &'static str {
        match self {
            JsSuiteKind::Lms => "lms/static/js_test.yml",
            JsSuiteKind::Cms => "cms/static/js_test.yml",
            JsSuiteKind::CmsSquire => "cms/static/js_test_squire.yml",
            JsSuiteKind::Xmodule => "common/lib/xmodule/xmodule/js/js_test.yml",
            JsSuiteKind::Common => "common/static/js_test.yml",
        }
    }
}

impl FromStr for JsSuiteKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JsSuiteKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = JsSuiteKind::ALL.iter().map(|k| k.as_str()).collect();
                format!(
                    "unknown JavaScript suite '{s}' (expected one of: {})",
                    known.join(", ")
                )
            })
    }
}

impl fmt::Display for JsSuiteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How js-test-tool is invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsTestMode {
    /// Run headless and print results to the console
    #[default]
    Run,
    /// Open the suite in the default browser
    Dev,
}

impl JsTestMode {
    pub fn as_str(self) -> &'static str {
        match self {
            JsTestMode::Run => "run",
            JsTestMode::Dev => "dev",
        }
    }
}

/// Suite for the JavaScript tests.
pub struct JsTestSuite {
    suite: Option<JsSuiteKind>,
    mode: JsTestMode,
    with_coverage: bool,
}

impl JsTestSuite {
    pub fn new(suite: Option<JsSuiteKind>, mode: JsTestMode) -> Self {
        Self {
            suite,
            mode,
            with_coverage: true,
        }
    }

    pub fn with_coverage(mut self, yes: bool) -> Self {
        self.with_coverage = yes;
        self
    }

    /// With no suite selected, every known description runs in one pass.
    fn suite_descriptions(&self) -> String {
        match self.suite {
            Some(kind) => kind.config_path().to_string(),
            None => {
                let paths: Vec<&str> = JsSuiteKind::ALL.iter().map(|k| k.config_path()).collect();
                paths.join(" ")
            }
        }
    }
}

impl Suite for JsTestSuite {
    fn name(&self) -> &str {
        "javascript"
    }

    fn cmd(&self, ctx: &SuiteContext) -> Option<String> {
        let xunit_report = ctx
            .env
            .suite_report_dir(self.name())
            .join("javascript_xunit.xml");

        Some(format!(
            "js-test-tool {mode} {suites} --use-firefox --timeout-sec {JS_TIMEOUT_SEC} \
             --xunit-report {report}",
            mode = self.mode.as_str(),
            suites = self.suite_descriptions(),
            report = xunit_report.display(),
        ))
    }

    fn runs_under_coverage(&self) -> bool {
        // Coverage is only meaningful for headless runs
        self.with_coverage && self.mode == JsTestMode::Run
    }

    fn coverage_cmd(&self, cmd: &str, ctx: &SuiteContext) -> String {
        let coverage_xml = ctx.env.suite_report_dir(self.name()).join("coverage.xml");
        format!("{cmd} --coverage-xml {}", coverage_xml.display())
    }

    fn set_up(&self, ctx: &SuiteContext) -> Result<(), SuiteError> {
        let wrap = |source: io::Error| SuiteError::SetUp {
            suite: self.name().to_string(),
            source,
        };

        env::clean_dir(ctx.env.suite_report_dir(self.name())).map_err(wrap)?;
        env::clean_test_files(&ctx.env).map_err(wrap)?;
        Ok(())
    }
}

/// Print one ready-to-paste invocation per known suite.
pub fn print_available_suites(mode: JsTestMode) {
    for kind in JsSuiteKind::ALL {
        match mode {
            JsTestMode::Run => println!("    proctor js --suite {kind}"),
            JsTestMode::Dev => println!("    proctor js --suite {kind} --dev"),
        }
    }
}
