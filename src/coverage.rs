//! Coverage report generation
//!
//! Builds the HTML, XML, and diff coverage reports from the data files a
//! previous test run left under the reports root. Python data files are
//! rendered per library with coverage.py; the combined diff report then
//! takes every coverage XML found, JavaScript included.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::env::Env;
use crate::suites::exec::{CommandRunner, SuiteError};
use crate::suites::python::lib_suite_dirs;

#[derive(Debug, Error)]
pub enum CoverageError {
    #[error("No coverage info found. Run `proctor test` before `proctor coverage`.")]
    NoData,

    #[error("`{cmd}` exited with code {code}")]
    CommandFailed { cmd: String, code: i32 },

    #[error(transparent)]
    Suite(#[from] SuiteError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Build every coverage report the previous run has data for.
pub fn build_reports(env: &Env, runner: &dyn CommandRunner) -> Result<(), CoverageError> {
    // Per-library HTML and XML reports from coverage.py data files
    for dir in lib_suite_dirs(env)? {
        let report_dir = env.suite_report_dir(&dir);
        if !report_dir.join(".coverage").is_file() {
            continue;
        }

        run_checked(
            runner,
            env,
            &format!("coverage html --rcfile={dir}/.coveragerc"),
        )?;
        run_checked(
            runner,
            env,
            &format!(
                "coverage xml -o {}/coverage.xml --rcfile={dir}/.coveragerc",
                report_dir.display()
            ),
        )?;
    }

    // Every coverage XML under the reports root (Python and JavaScript)
    let mut xml_reports = Vec::new();
    find_coverage_xml(&env.report_root, &mut xml_reports)?;
    xml_reports.sort();

    if xml_reports.is_empty() {
        return Err(CoverageError::NoData);
    }

    let xml_report_str = xml_reports
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" ");
    let diff_html_path = env.report_root.join("diff_coverage_combined.html");

    // Combined diff coverage: once for the HTML report, once for the console
    run_checked(
        runner,
        env,
        &format!(
            "diff-cover {xml_report_str} --html-report {}",
            diff_html_path.display()
        ),
    )?;
    run_checked(runner, env, &format!("diff-cover {xml_report_str}"))?;

    Ok(())
}

fn run_checked(runner: &dyn CommandRunner, env: &Env, cmd: &str) -> Result<(), CoverageError> {
    match runner.run(cmd, &[], &env.repo_root)? {
        0 => Ok(()),
        code => Err(CoverageError::CommandFailed {
            cmd: cmd.to_string(),
            code,
        }),
    }
}

fn find_coverage_xml(dir: &Path, found: &mut Vec<PathBuf>) -> io::Result<()> {
    if !dir.is_dir() {
        return Ok(());
    }
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            find_coverage_xml(&path, found)?;
        } else if entry.file_name() == "coverage.xml" {
            found.push(path);
        }
    }
    Ok(())
}
