//! Workspace layout shared by the test tasks.
//!
//! All tasks agree on a single set of directories beneath the repository
//! root: `reports/` for xunit and coverage artifacts, `.testids/` for the
//! per-suite test-id files the Python runner maintains, and `test_root/`
//! scratch locations the application writes during tests.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Resolved workspace paths for a test run.
#[derive(Debug, Clone)]
pub struct Env {
    /// Repository root all suite commands run from
    pub repo_root: PathBuf,
    /// Root directory for xunit and coverage artifacts
    pub report_root: PathBuf,
    /// Root directory for per-suite test-id files
    pub test_id_root: PathBuf,
}

impl Env {
    /// Resolve the workspace from `PROCTOR_REPO_ROOT`, falling back to the
    /// current directory.
    pub fn from_current_dir() -> io::Result<Self> {
        let repo_root = match env::var_os("PROCTOR_REPO_ROOT") {
            Some(root) => PathBuf::from(root),
            None => env::current_dir()?,
        };
        Ok(Self::at(repo_root))
    }

    /// Build an `Env` rooted at an explicit repository path.
    pub fn at(repo_root: impl Into<PathBuf>) -> Self {
        let repo_root = repo_root.into();
        let report_root = repo_root.join("reports");
        let test_id_root = repo_root.join(".testids");
        Self {
            repo_root,
            report_root,
            test_id_root,
        }
    }

    /// Report directory for a named suite.
    ///
    /// Suite names may contain path separators (`common/lib/capa`); the
    /// report tree mirrors them.
    pub fn suite_report_dir(&self, suite: &str) -> PathBuf {
        self.report_root.join(suite)
    }

    /// Test-id directory for a named suite.
    pub fn suite_test_id_dir(&self, suite: &str) -> PathBuf {
        self.test_id_root.join(suite)
    }
}

/// Create a directory (and any missing parents), returning its path.
pub fn get_or_make_dir(path: impl AsRef<Path>) -> io::Result<PathBuf> {
    let path = path.as_ref();
    fs::create_dir_all(path)?;
    Ok(path.to_path_buf())
}

/// Recreate a directory empty.
pub fn clean_dir(path: impl AsRef<Path>) -> io::Result<()> {
    let path = path.as_ref();
    if path.exists() {
        fs::remove_dir_all(path)?;
    }
    fs::create_dir_all(path)
}

/// Scratch locations the application writes under the repo root while tests
/// run. Removed before a suite starts so stale state cannot mask failures.
const TEST_SCRATCH_DIRS: &[&str] = &["test_root/log", "test_root/data", "test_root/uploads"];

/// Remove scratch files left behind by previous test runs.
pub fn clean_test_files(env: &Env) -> io::Result<()> {
    for dir in TEST_SCRATCH_DIRS {
        let path = env.repo_root.join(dir);
        if path.exists() {
            fs::remove_dir_all(&path)?;
        }
    }
    Ok(())
}

/// Empty the reports root, keeping the directory itself.
pub fn clean_reports_dir(env: &Env) -> io::Result<()> {
    clean_dir(&env.report_root)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_layout() {
        let env = Env::at("/repo");
        assert_eq!(env.report_root, PathBuf::from("/repo/reports"));
        assert_eq!(env.test_id_root, PathBuf::from("/repo/.testids"));
        assert_eq!(
            env.suite_report_dir("common/lib/capa"),
            PathBuf::from("/repo/reports/common/lib/capa")
        );
        assert_eq!(
            env.suite_test_id_dir("lms"),
            PathBuf::from("/repo/.testids/lms")
        );
    }

    #[test]
    fn test_get_or_make_dir_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a/b/c");

        let made = get_or_make_dir(&nested).unwrap();
        assert!(made.is_dir());

        // Second call succeeds on the existing directory
        let again = get_or_make_dir(&nested).unwrap();
        assert_eq!(made, again);
    }

    #[test]
    fn test_clean_dir_empties_contents() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("reports");
        fs::create_dir_all(dir.join("lms")).unwrap();
        fs::write(dir.join("lms/nosetests.xml"), "<xml/>").unwrap();

        clean_dir(&dir).unwrap();

        assert!(dir.is_dir());
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 0);
    }

    #[test]
    fn test_clean_test_files_removes_scratch() {
        let tmp = tempfile::tempdir().unwrap();
        let env = Env::at(tmp.path());
        let logs = tmp.path().join("test_root/log");
        fs::create_dir_all(&logs).unwrap();
        fs::write(logs.join("lms.log"), "log line").unwrap();

        clean_test_files(&env).unwrap();

        assert!(!logs.exists());
        // Missing scratch dirs are not an error
        clean_test_files(&env).unwrap();
    }
}
