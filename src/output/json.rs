//! JSON output formatter

use super::OutputFormatter;
use crate::diagnostic::{EvaluationResult, RuleResult};

/// JSON formatter for machine-readable output
#[derive(Default)]
pub struct JsonFormatter {
    /// Pretty print with indentation
    pub pretty: bool,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable pretty printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    fn render<T: serde::Serialize>(&self, value: &T) -> String {
        if self.pretty {
            serde_json::to_string_pretty(value).unwrap_or_default()
        } else {
            serde_json::to_string(value).unwrap_or_default()
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, result: &EvaluationResult) -> String {
        self.render(result)
    }

    fn format_rule(&self, rule: &RuleResult) -> String {
        self.render(rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::{FileHighlight, RuleStatus};
    use crate::rule::Level;

    #[test]
    fn test_json_format_rule() {
        let formatter = JsonFormatter::new();
        let rule = RuleResult::new("LINK_1", Level::Error, "Links resolve", RuleStatus::Failed)
            .with_highlights(vec![FileHighlight::new("README.md", 4, "[x](y.png)")]);

        let output = formatter.format_rule(&rule);
        assert!(output.contains("\"id\":\"LINK_1\""));
        assert!(output.contains("\"level\":\"error\""));
        assert!(output.contains("\"lineNumber\":4"));
        assert!(!output.contains("status"));
    }

    #[test]
    fn test_json_format_result() {
        let formatter = JsonFormatter::new();
        let mut result = EvaluationResult::new("blueprint-repo");
        result.push(RuleResult::new("A_1", Level::Warning, "d", RuleStatus::Passed));

        let output = formatter.format(&result);
        assert!(output.starts_with("{\"success\":[{"));
        assert!(output.contains("\"failed\":[]"));
        assert!(output.contains("\"error\":[]"));
        assert!(output.contains("\"repo\":\"blueprint-repo\""));
    }

    #[test]
    fn test_json_pretty() {
        let formatter = JsonFormatter::new().pretty();
        let output = formatter.format(&EvaluationResult::new("r"));
        assert!(output.contains('\n'));
    }
}
