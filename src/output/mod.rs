//! Output formatters for evaluation results

mod json;
mod text;

pub use json::JsonFormatter;
pub use text::TextFormatter;

use crate::diagnostic::{EvaluationResult, RuleResult};
use std::path::Path;

/// Output formatter trait
pub trait OutputFormatter: Send + Sync {
    /// Format the entire evaluation result
    fn format(&self, result: &EvaluationResult) -> String;

    /// Format a single rule result
    fn format_rule(&self, rule: &RuleResult) -> String;
}

/// Write the JSON report to `path`, creating parent directories as needed
pub fn write_report(result: &EvaluationResult, path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string(result).map_err(std::io::Error::other)?;
    std::fs::write(path, json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::RuleStatus;
    use crate::rule::Level;
    use tempfile::TempDir;

    #[test]
    fn test_write_report() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("reports/result.json");

        let mut result = EvaluationResult::new("repo");
        result.push(RuleResult::new("A_1", Level::Error, "d", RuleStatus::Passed));
        write_report(&result, &path).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["repo"], "repo");
        assert_eq!(written["success"][0]["id"], "A_1");
    }
}
