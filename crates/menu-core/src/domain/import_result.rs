//! Import summary returned to the caller

use serde::{Deserialize, Serialize};

/// Name used in the error log when a failed node has no name.
pub const UNKNOWN_MENU: &str = "Unknown";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImportFailure {
    pub menu: String,
    pub error: String,
}

/// Counters and error log for one import call.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ImportResult {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
    pub skipped: usize,
    pub errors: Vec<ImportFailure>,
}

impl ImportResult {
    pub fn record_seen(&mut self) {
        self.total += 1;
    }

    pub fn record_success(&mut self) {
        self.success += 1;
    }

    pub fn record_skipped(&mut self) {
        self.skipped += 1;
    }

    pub fn record_failure(&mut self, menu: &str, error: impl ToString) {
        self.failed += 1;
        let menu = if menu.is_empty() { UNKNOWN_MENU } else { menu };
        self.errors.push(ImportFailure {
            menu: menu.to_string(),
            error: error.to_string(),
        });
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_without_name_is_unknown() {
        let mut result = ImportResult::default();
        result.record_seen();
        result.record_failure("", "boom");

        assert_eq!(result.total, 1);
        assert_eq!(result.failed, 1);
        assert!(result.has_failures());
        assert_eq!(result.errors[0].menu, UNKNOWN_MENU);
        assert_eq!(result.errors[0].error, "boom");
    }
}
