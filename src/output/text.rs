//! Human-readable text output formatter

use super::OutputFormatter;
use crate::diagnostic::{EvaluationResult, RuleResult, RuleStatus};
use crate::rule::Level;
use colored::*;

/// Text formatter with optional color support
pub struct TextFormatter {
    /// Enable colored output
    pub colored: bool,

    /// List passing rules too
    pub show_success: bool,

    /// Show file highlights
    pub show_highlights: bool,

    /// Show summary line
    pub show_stats: bool,
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self {
            colored: true,
            show_success: true,
            show_highlights: true,
            show_stats: true,
        }
    }
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new() -> Self {
        Self::default()
    }

    /// Disable colors
    pub fn without_color(mut self) -> Self {
        self.colored = false;
        self
    }

    /// Only list failed and errored rules
    pub fn problems_only(mut self) -> Self {
        self.show_success = false;
        self
    }

    fn paint(&self, s: &str, f: fn(&str) -> ColoredString) -> String {
        if self.colored {
            f(s).to_string()
        } else {
            s.to_string()
        }
    }

    fn banner(&self, status: RuleStatus) -> String {
        match status {
            RuleStatus::Passed => self.paint("--- SUCCESS ---", |s| s.green().bold()),
            RuleStatus::Failed => self.paint("--- FAILED ---", |s| s.red().bold()),
            RuleStatus::Errored => self.paint("--- ERROR ---", |s| s.magenta().bold()),
        }
    }

    fn level_str(&self, level: Level) -> String {
        let s = level.to_string();
        match level {
            Level::Error => self.paint(&s, |s| s.red()),
            Level::Warning => self.paint(&s, |s| s.yellow()),
        }
    }
}

fn plural(count: usize, word: &str) -> String {
    format!("{} {}{}", count, word, if count == 1 { "" } else { "s" })
}

impl OutputFormatter for TextFormatter {
    fn format(&self, result: &EvaluationResult) -> String {
        let mut output = String::new();

        let mut buckets = vec![&result.failed, &result.error];
        if self.show_success {
            buckets.insert(0, &result.success);
        }

        for bucket in buckets {
            for rule in bucket {
                output.push_str(&self.format_rule(rule));
                output.push('\n');
            }
        }

        if self.show_stats {
            output.push_str(&format!("{}: ", result.repo));

            let mut counts = vec![self.paint(&format!("{} passed", result.success.len()), |s| {
                s.green()
            })];
            if !result.failed.is_empty() {
                counts.push(self.paint(
                    &format!(
                        "{} failed ({}, {})",
                        result.failed.len(),
                        plural(result.failed_at(Level::Error), "error"),
                        plural(result.failed_at(Level::Warning), "warning")
                    ),
                    |s| s.red(),
                ));
            }
            if !result.error.is_empty() {
                counts.push(self.paint(
                    &format!("{} could not be evaluated", result.error.len()),
                    |s| s.magenta(),
                ));
            }

            output.push_str(&counts.join(", "));
            output.push('\n');
        }

        output
    }

    fn format_rule(&self, rule: &RuleResult) -> String {
        let mut output = String::new();

        output.push_str(&format!("{}\n", self.banner(rule.status)));
        output.push_str(&format!(
            "{}\nLevel: {}\nDescription: {}\n",
            self.paint(&rule.id, |s| s.cyan()),
            self.level_str(rule.level),
            rule.description
        ));

        if self.show_highlights {
            for highlight in &rule.file_highlights {
                output.push_str(&format!("File: {}\n", highlight.path));
                if highlight.line_number > 0 {
                    output.push_str(&format!("Line #{}\n", highlight.line_number));
                    for line in highlight.line_content.lines() {
                        output.push_str(&format!("\t{}\n", self.paint(line, |s| s.dimmed())));
                    }
                }
            }
        }

        if let Some(err) = &rule.error {
            output.push_str(&format!(
                "{} {}\n",
                self.paint("Error:", |s| s.magenta().bold()),
                err.message
            ));
        }

        output
    }
}
