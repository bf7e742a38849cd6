//! Content Lint - rule-driven linter for documentation repositories
//!
//! Checks that a content repository (for example a developer-center
//! blueprint) has the files, sections and links a rule set asks for.
//!
//! # Architecture
//!
//! ```text
//! CLI/API -> RuleSet -> Engine -> (group task -> rule task -> checks) -> EvaluationResult
//! ```
//!
//! A rule set holds named groups of rules. Each rule targets one path or a
//! list of files and carries an ordered list of conditions: `pathExists`,
//! `contains`, `notContains` and `checkReferenceExist`. The engine evaluates
//! all rules concurrently and buckets the results into success, failed and
//! error, each sorted by `<group>_<rule>` id.
//!
//! # Rule example
//!
//! ```yaml
//! name: Blueprint Rules
//! ruleGroups:
//!   CONTENT:
//!     description: Blueprint page content
//!     rules:
//!       "1":
//!         description: Has a Scenario section
//!         path: ./blueprint/index.md
//!         level: error
//!         conditions:
//!           - contains:
//!               - type: regex
//!                 value: "(?m)^## Scenario"
//! ```

pub mod conditions;
pub mod config;
pub mod diagnostic;
pub mod engine;
pub mod output;
pub mod progress;
pub mod repo;
pub mod rule;
pub mod ruleset;

// Re-export main types
pub use conditions::{Check, CheckOutcome, EvalError, MatchKind};
pub use config::Config;
pub use diagnostic::{EvaluationError, EvaluationResult, FileHighlight, RuleResult, RuleStatus};
pub use engine::{dispatch_group, evaluate_rule, Completion, DispatchError, Engine};
pub use output::{write_report, JsonFormatter, OutputFormatter, TextFormatter};
pub use progress::{LogProgress, NoopProgress, Progress};
pub use rule::{Condition, ContainsCondition, Level, Rule, Target};
pub use ruleset::{LoadError, RuleGroup, RuleSet};
