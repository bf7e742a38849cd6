//! Result types for rule evaluation

use crate::conditions::EvalError;
use crate::rule::Level;
use serde::{Deserialize, Serialize};

/// A located excerpt supporting a verdict
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileHighlight {
    /// Path relative to the content root
    pub path: String,
    /// Line number (1-based), or start line of a multi-line match. 0 when the
    /// evidence is about the path itself.
    pub line_number: usize,
    /// The matched or offending text
    pub line_content: String,
    /// Lines spanned by the evidence
    #[serde(default = "default_line_count", skip_serializing_if = "is_single_line")]
    pub line_count: usize,
}

fn default_line_count() -> usize {
    1
}

fn is_single_line(count: &usize) -> bool {
    *count <= 1
}

impl FileHighlight {
    pub fn new(path: &str, line_number: usize, line_content: &str) -> Self {
        Self {
            path: path.to_string(),
            line_number,
            line_content: line_content.to_string(),
            line_count: 1,
        }
    }

    /// Evidence that refers to a path rather than a line in it
    pub fn path_only(path: &str) -> Self {
        Self::new(path, 0, "")
    }

    pub fn with_line_count(mut self, line_count: usize) -> Self {
        self.line_count = line_count;
        self
    }
}

/// Verdict of a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleStatus {
    Passed,
    Failed,
    Errored,
}

/// Why a rule could not be evaluated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationError {
    pub rule_id: String,
    pub message: String,
}

impl std::fmt::Display for EvaluationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "error on rule {}: {}", self.rule_id, self.message)
    }
}

/// Outcome of one rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleResult {
    /// `<groupId>_<ruleId>`
    pub id: String,
    pub level: Level,
    pub description: String,
    #[serde(skip)]
    pub status: RuleStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub file_highlights: Vec<FileHighlight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<EvaluationError>,
}

impl RuleResult {
    pub fn new(id: &str, level: Level, description: &str, status: RuleStatus) -> Self {
        Self {
            id: id.to_string(),
            level,
            description: description.to_string(),
            status,
            file_highlights: Vec::new(),
            error: None,
        }
    }

    pub fn with_highlights(mut self, highlights: Vec<FileHighlight>) -> Self {
        self.file_highlights = highlights;
        self
    }

    /// Mark as errored and record the cause
    pub fn with_error(mut self, err: &EvalError) -> Self {
        self.status = RuleStatus::Errored;
        self.error = Some(EvaluationError {
            rule_id: self.id.clone(),
            message: err.to_string(),
        });
        self
    }
}

/// Bucketed results of a full run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EvaluationResult {
    pub success: Vec<RuleResult>,
    pub failed: Vec<RuleResult>,
    pub error: Vec<RuleResult>,
    /// Content repository identifier
    pub repo: String,
}

impl EvaluationResult {
    pub fn new(repo: &str) -> Self {
        Self {
            repo: repo.to_string(),
            ..Self::default()
        }
    }

    /// Place a result in the bucket matching its status
    pub fn push(&mut self, result: RuleResult) {
        match result.status {
            RuleStatus::Passed => self.success.push(result),
            RuleStatus::Failed => self.failed.push(result),
            RuleStatus::Errored => self.error.push(result),
        }
    }

    /// Order every bucket by rule id. Stable, so equal ids keep arrival order.
    pub fn sort(&mut self) {
        for bucket in [&mut self.success, &mut self.failed, &mut self.error] {
            bucket.sort_by(|a, b| a.id.cmp(&b.id));
        }
    }

    /// Total number of rule results
    pub fn total(&self) -> usize {
        self.success.len() + self.failed.len() + self.error.len()
    }

    /// Check if every rule passed
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.error.is_empty()
    }

    /// Number of failed rules at a level
    pub fn failed_at(&self, level: Level) -> usize {
        self.failed.iter().filter(|r| r.level == level).count()
    }

    /// Get exit code (0 = clean, 1 = warning-level failures only, 2 = errors)
    pub fn exit_code(&self) -> i32 {
        if !self.error.is_empty() || self.failed_at(Level::Error) > 0 {
            2
        } else if !self.failed.is_empty() {
            1
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(id: &str, level: Level, status: RuleStatus) -> RuleResult {
        RuleResult::new(id, level, "desc", status)
    }

    #[test]
    fn test_push_buckets_by_status() {
        let mut eval = EvaluationResult::new("repo");
        eval.push(result("A_1", Level::Error, RuleStatus::Passed));
        eval.push(result("A_2", Level::Error, RuleStatus::Failed));
        eval.push(result("A_3", Level::Error, RuleStatus::Errored));

        assert_eq!(eval.success.len(), 1);
        assert_eq!(eval.failed.len(), 1);
        assert_eq!(eval.error.len(), 1);
        assert_eq!(eval.total(), 3);
    }

    #[test]
    fn test_sort_is_lexicographic() {
        let mut eval = EvaluationResult::new("repo");
        for id in ["LINK_1", "CONTENT_2", "CONTENT_10", "STRUCT_1"] {
            eval.push(result(id, Level::Error, RuleStatus::Passed));
        }
        eval.sort();

        let ids: Vec<_> = eval.success.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["CONTENT_10", "CONTENT_2", "LINK_1", "STRUCT_1"]);
    }

    #[test]
    fn test_exit_code() {
        let mut eval = EvaluationResult::new("repo");
        assert_eq!(eval.exit_code(), 0);
        assert!(eval.is_clean());

        eval.push(result("A_1", Level::Warning, RuleStatus::Failed));
        assert_eq!(eval.exit_code(), 1);

        eval.push(result("A_2", Level::Error, RuleStatus::Failed));
        assert_eq!(eval.exit_code(), 2);

        let mut errored = EvaluationResult::new("repo");
        errored.push(result("A_3", Level::Warning, RuleStatus::Errored));
        assert_eq!(errored.exit_code(), 2);
    }

    #[test]
    fn test_with_error_marks_errored() {
        let err = EvalError::Config("rule has no conditions".to_string());
        let r = result("G_1", Level::Error, RuleStatus::Passed).with_error(&err);

        assert_eq!(r.status, RuleStatus::Errored);
        let detail = r.error.unwrap();
        assert_eq!(detail.rule_id, "G_1");
        assert!(detail.message.contains("no conditions"));
    }

    #[test]
    fn test_serialized_shape() {
        let mut eval = EvaluationResult::new("my-repo");
        eval.push(
            result("G_1", Level::Error, RuleStatus::Failed)
                .with_highlights(vec![FileHighlight::new("README.md", 2, "TODO")]),
        );
        eval.push(result("G_2", Level::Warning, RuleStatus::Passed));

        let value = serde_json::to_value(&eval).unwrap();
        assert_eq!(value["repo"], "my-repo");
        assert_eq!(value["failed"][0]["id"], "G_1");
        assert_eq!(value["failed"][0]["level"], "error");
        assert_eq!(value["failed"][0]["fileHighlights"][0]["lineNumber"], 2);
        assert_eq!(value["failed"][0]["fileHighlights"][0]["lineContent"], "TODO");
        assert!(value["failed"][0]["fileHighlights"][0].get("lineCount").is_none());
        assert!(value["failed"][0].get("status").is_none());
        assert!(value["success"][0].get("fileHighlights").is_none());
        assert!(value["success"][0].get("error").is_none());
        assert_eq!(value["error"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_multi_line_highlight_serializes_count() {
        let h = FileHighlight::new("index.md", 1, "---\n---").with_line_count(2);
        let value = serde_json::to_value(&h).unwrap();
        assert_eq!(value["lineCount"], 2);
    }
}
