//! The `Suite` trait and the tree runner
//!
//! Suites form a tree: leaves carry a shell command, composites carry
//! children, and some nodes carry both. `run_suite` walks the tree
//! depth-first and returns a `SuiteOutcome` whose `failed` flag is the
//! logical OR of the node's own command result and every child's flag.
//! The run never stops early: a failing suite does not prevent its siblings
//! from running, so one invocation reports every broken category at once.

use super::exec::{CommandRunner, SuiteError};
use crate::env::Env;

// ============================================================================
// Suite trait
// ============================================================================

/// Shared context handed to every suite hook.
#[derive(Debug, Clone)]
pub struct SuiteContext {
    pub env: Env,
}

impl SuiteContext {
    pub fn new(env: Env) -> Self {
        Self { env }
    }
}

/// A named group of tests with a command to invoke them and zero or more
/// child suites.
pub trait Suite {
    /// Display name, used in banners and the failure list.
    fn name(&self) -> &str;

    /// The shell command for this node, or `None` for pure composites.
    fn cmd(&self, _ctx: &SuiteContext) -> Option<String> {
        None
    }

    /// Whether the command should be rewrapped by `coverage_cmd` before
    /// running.
    fn runs_under_coverage(&self) -> bool {
        false
    }

    /// Rewrap a command for coverage collection. The default leaves the
    /// command unchanged.
    fn coverage_cmd(&self, cmd: &str, _ctx: &SuiteContext) -> String {
        cmd.to_string()
    }

    /// Extra environment variables for the subprocess.
    fn extra_env(&self, _ctx: &SuiteContext) -> Vec<(String, String)> {
        Vec::new()
    }

    /// Runs before this suite's command and children.
    ///
    /// i.e. creating report directories, removing stale artifacts.
    fn set_up(&self, _ctx: &SuiteContext) -> Result<(), SuiteError> {
        Ok(())
    }

    /// Runs after this suite's command and children have finished.
    fn clean_up(&self, _ctx: &SuiteContext) {}

    /// Child suites, run after this node's own command.
    fn children(&self) -> &[Box<dyn Suite>] {
        &[]
    }
}

/// A suite with a name and children only.
pub struct CompositeSuite {
    name: String,
    children: Vec<Box<dyn Suite>>,
}

impl CompositeSuite {
    pub fn new(name: impl Into<String>, children: Vec<Box<dyn Suite>>) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }
}

impl Suite for CompositeSuite {
    fn name(&self) -> &str {
        &self.name
    }

    fn children(&self) -> &[Box<dyn Suite>] {
        &self.children
    }
}

// ============================================================================
// Tree runner
// ============================================================================

/// Result of running a suite tree.
#[derive(Debug)]
pub struct SuiteOutcome {
    pub name: String,
    /// OR of this node's own command failure and all children's flags.
    pub failed: bool,
    /// Names of every failing node in the tree, in visit order.
    pub failed_suites: Vec<String>,
}

/// Run a suite tree depth-first, returning the aggregated outcome.
pub fn run_suite(
    suite: &dyn Suite,
    ctx: &SuiteContext,
    runner: &dyn CommandRunner,
) -> SuiteOutcome {
    let name = suite.name().to_string();
    let mut failed = false;
    let mut failed_suites = Vec::new();

    eprintln!("Setting up for {name}");
    match suite.set_up(ctx) {
        Err(e) => {
            // A suite that cannot set up is failed, but its siblings and
            // children still run.
            tracing::error!(suite = %name, error = %e, "suite setup failed");
            failed = true;
            failed_suites.push(name.clone());
        }
        Ok(()) => {
            if let Some(cmd) = suite.cmd(ctx) {
                let cmd = if suite.runs_under_coverage() {
                    suite.coverage_cmd(&cmd, ctx)
                } else {
                    cmd
                };

                let bar = "=".repeat(40);
                eprintln!("\x1b[32m\n{bar}\n Running tests for {name} \n{bar}\n\x1b[0m");
                println!("{cmd}");

                let extra_env = suite.extra_env(ctx);
                match runner.run(&cmd, &extra_env, &ctx.env.repo_root) {
                    Ok(0) => {}
                    Ok(code) => {
                        tracing::debug!(suite = %name, code, "suite command failed");
                        failed = true;
                        failed_suites.push(name.clone());
                    }
                    Err(e) => {
                        tracing::error!(suite = %name, error = %e, "suite command did not run");
                        failed = true;
                        failed_suites.push(name.clone());
                    }
                }
            }
        }
    }

    for child in suite.children() {
        let child_outcome = run_suite(child.as_ref(), ctx, runner);
        if child_outcome.failed {
            failed = true;
            failed_suites.extend(child_outcome.failed_suites);
        }
    }

    eprintln!("Cleaning up after {name}");
    suite.clean_up(ctx);

    SuiteOutcome {
        name,
        failed,
        failed_suites,
    }
}

/// Print the failure list (red) or the all-clear banner (green) to stderr.
pub fn report_failures(outcome: &SuiteOutcome) {
    let bar = "=".repeat(48);
    if outcome.failed {
        eprintln!("\n\n\x1b[31m{bar}\nTests failed in the following suites:\x1b[0m");
        for suite in &outcome.failed_suites {
            eprintln!("\x1b[31m* {suite}\x1b[0m");
        }
        eprintln!();
    } else {
        eprintln!("\n\n\x1b[32m{bar}\nNo test failures! Yay!\x1b[0m\n");
    }
}

// ============================================================================
// Tests
// ============================================================================
