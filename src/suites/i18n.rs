//! Translation test suite
//!
//! The i18n checks still live in the legacy rake task; this leaf only shells
//! out to it.

use super::suite::{Suite, SuiteContext};

pub struct I18nTestSuite;

impl Suite for I18nTestSuite {
    fn name(&self) -> &str {
        "i18n"
    }

    fn cmd(&self, _ctx: &SuiteContext) -> Option<String> {
        Some("rake i18n:test".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::Env;

    #[test]
    fn test_i18n_cmd() {
        let ctx = SuiteContext::new(Env::at("/repo"));
        assert_eq!(I18nTestSuite.cmd(&ctx).unwrap(), "rake i18n:test");
        assert!(!I18nTestSuite.runs_under_coverage());
    }
}
