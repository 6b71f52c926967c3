//! End-to-end suite tree runs against the real shell runner

use proctor::env::Env;
use proctor::suites::{
    CompositeSuite, ShellRunner, Suite, SuiteContext, SystemKind, SystemTestSuite, run_suite,
};

/// Minimal leaf wrapping a fixed shell command.
struct ShellSuite {
    name: &'static str,
    cmd: &'static str,
}

impl Suite for ShellSuite {
    fn name(&self) -> &str {
        self.name
    }

    fn cmd(&self, _ctx: &SuiteContext) -> Option<String> {
        Some(self.cmd.to_string())
    }
}

fn ctx_in_tempdir() -> (tempfile::TempDir, SuiteContext) {
    let tmp = tempfile::tempdir().unwrap();
    let ctx = SuiteContext::new(Env::at(tmp.path()));
    (tmp, ctx)
}

#[test]
fn test_tree_aggregates_real_exit_codes() {
    let (_tmp, ctx) = ctx_in_tempdir();
    let root = CompositeSuite::new(
        "all",
        vec![
            Box::new(ShellSuite {
                name: "passing",
                cmd: "true",
            }) as Box<dyn Suite>,
            Box::new(ShellSuite {
                name: "failing",
                cmd: "false",
            }),
            Box::new(ShellSuite {
                name: "also passing",
                cmd: "exit 0",
            }),
        ],
    );

    let outcome = run_suite(&root, &ctx, &ShellRunner);

    assert!(outcome.failed);
    assert_eq!(outcome.failed_suites, ["failing"]);
}

#[test]
fn test_all_green_tree_reports_no_failures() {
    let (_tmp, ctx) = ctx_in_tempdir();
    let root = CompositeSuite::new(
        "all",
        vec![
            Box::new(ShellSuite {
                name: "a",
                cmd: "true",
            }) as Box<dyn Suite>,
            Box::new(ShellSuite {
                name: "b",
                cmd: "true",
            }),
        ],
    );

    let outcome = run_suite(&root, &ctx, &ShellRunner);

    assert!(!outcome.failed);
    assert!(outcome.failed_suites.is_empty());
}

#[test]
fn test_missing_command_marks_suite_failed() {
    let (_tmp, ctx) = ctx_in_tempdir();
    let root = CompositeSuite::new(
        "all",
        vec![Box::new(ShellSuite {
            name: "broken",
            cmd: "proctor-no-such-tool-xyzzy",
        }) as Box<dyn Suite>],
    );

    let outcome = run_suite(&root, &ctx, &ShellRunner);

    assert!(outcome.failed);
    assert_eq!(outcome.failed_suites, ["broken"]);
}

#[test]
fn test_system_suite_set_up_creates_workspace_layout() {
    let (tmp, ctx) = ctx_in_tempdir();
    let suite = SystemTestSuite::new(SystemKind::Lms);

    suite.set_up(&ctx).unwrap();

    assert!(tmp.path().join("reports/lms").is_dir());
    assert!(tmp.path().join(".testids/lms").is_dir());
}

#[test]
fn test_system_suite_set_up_empties_stale_reports() {
    let (tmp, ctx) = ctx_in_tempdir();
    let stale = tmp.path().join("reports/lms/old.xml");
    std::fs::create_dir_all(stale.parent().unwrap()).unwrap();
    std::fs::write(&stale, "<xml/>").unwrap();

    let suite = SystemTestSuite::new(SystemKind::Lms);
    suite.set_up(&ctx).unwrap();

    assert!(!stale.exists());
    assert!(tmp.path().join("reports/lms").is_dir());
}
