//! Subprocess boundary for suite commands
//!
//! Suite commands are shell strings (they rely on globs and backticks), so
//! the default runner hands them to `sh -c` and waits. The `CommandRunner`
//! trait is the seam that lets the tree runner and the coverage task be
//! exercised in tests without spawning processes.

use std::path::Path;
use std::process::Command;

use thiserror::Error;

/// Errors that occur while preparing or running a suite.
#[derive(Debug, Error)]
pub enum SuiteError {
    #[error("failed to spawn `{cmd}`: {source}")]
    Spawn {
        cmd: String,
        #[source]
        source: std::io::Error,
    },

    #[error("setup failed for {suite}: {source}")]
    SetUp {
        suite: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Run a shell command and report its exit code.
///
/// Implementations must wait for the command to finish. Output streams are
/// left attached to the parent so the underlying test runners own the
/// terminal while they run.
pub trait CommandRunner {
    /// Run `cmd` with `extra_env` applied, from the `cwd` directory.
    /// Returns the process exit code (0 for success).
    fn run(&self, cmd: &str, extra_env: &[(String, String)], cwd: &Path) -> Result<i32, SuiteError>;
}

/// Default runner: `sh -c <cmd>` with inherited stdio.
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn run(&self, cmd: &str, extra_env: &[(String, String)], cwd: &Path) -> Result<i32, SuiteError> {
        let status = Command::new("sh")
            .arg("-c")
            .arg(cmd)
            .current_dir(cwd)
            .envs(extra_env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .status()
            .map_err(|source| SuiteError::Spawn {
                cmd: cmd.to_string(),
                source,
            })?;

        // A signal-terminated child has no code; treat it as a plain failure
        Ok(status.code().unwrap_or(1))
    }
}
