//! Rule-set documents
//!
//! A rule set is read from JSON or YAML:
//!
//! ```json
//! {
//!   "name": "Blueprint Rules",
//!   "description": "Default rules for blueprints",
//!   "ruleGroups": {
//!     "STRUCT": {
//!       "description": "Required files",
//!       "rules": {
//!         "1": {
//!           "description": "A README.md must exist",
//!           "path": "./README.md",
//!           "conditions": [{ "pathExists": true }],
//!           "level": "error"
//!         }
//!       }
//!     }
//!   }
//! }
//! ```
//!
//! Loading checks the document's overall shape only. Problems inside a single
//! rule (no target, no conditions, unknown `contains` type, bad patterns) are
//! reported by the engine as an errored result for that rule.

use crate::rule::Rule;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

const BLUEPRINT_RULES: &str = include_str!("../rules/blueprint.json");

/// Rule-set loading error
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid rule set: {0}")]
    Invalid(String),
}

/// A named set of rules
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleGroup {
    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub rules: HashMap<String, Rule>,
}

impl RuleGroup {
    pub fn new(description: &str) -> Self {
        Self {
            description: description.to_string(),
            rules: HashMap::new(),
        }
    }

    /// Add a rule under an id
    pub fn with_rule(mut self, id: &str, rule: Rule) -> Self {
        self.rules.insert(id.to_string(), rule);
        self
    }
}

/// A complete rule-set document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSet {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub rule_groups: HashMap<String, RuleGroup>,
}

impl RuleSet {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Add a group under an id
    pub fn with_group(mut self, id: &str, group: RuleGroup) -> Self {
        self.rule_groups.insert(id.to_string(), group);
        self
    }

    /// The built-in developer-center blueprint rules
    pub fn blueprint() -> Result<Self, LoadError> {
        Self::from_validated_json(BLUEPRINT_RULES)
    }

    fn from_validated_json(content: &str) -> Result<Self, LoadError> {
        let rule_set = Self::from_json_str(content)?;
        rule_set.validate()?;
        Ok(rule_set)
    }

    /// Load a rule set from a file (YAML for `.yaml`/`.yml`, JSON otherwise)
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path)?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let rule_set = match ext {
            "yaml" | "yml" => Self::from_yaml_str(&content)?,
            _ => Self::from_json_str(&content)?,
        };

        rule_set.validate()?;
        Ok(rule_set)
    }

    pub fn from_json_str(content: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, LoadError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Check the document-level structure
    pub fn validate(&self) -> Result<(), LoadError> {
        if self.name.trim().is_empty() {
            return Err(LoadError::Invalid("rule set has no name".to_string()));
        }

        if self.rule_groups.is_empty() {
            return Err(LoadError::Invalid("rule set has no rule groups".to_string()));
        }

        for (group_id, group) in &self.rule_groups {
            if group_id.trim().is_empty() {
                return Err(LoadError::Invalid("rule group id is blank".to_string()));
            }
            if group.rules.is_empty() {
                return Err(LoadError::Invalid(format!(
                    "rule group '{}' has no rules",
                    group_id
                )));
            }
            if group.rules.keys().any(|id| id.trim().is_empty()) {
                return Err(LoadError::Invalid(format!(
                    "rule group '{}' has a blank rule id",
                    group_id
                )));
            }
        }

        Ok(())
    }

    /// Number of rules across all groups
    pub fn rule_count(&self) -> usize {
        self.rule_groups.values().map(|g| g.rules.len()).sum()
    }
}
