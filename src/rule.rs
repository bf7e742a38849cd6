//! Rule definition and condition expansion

use crate::conditions::{Check, EvalError, MatchKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Severity level of a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Reported, but does not fail a run on its own
    #[default]
    Warning,
    /// Failing this rule fails the run
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Warning => write!(f, "warning"),
            Level::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "warning" | "warn" => Ok(Level::Warning),
            "error" | "err" => Ok(Level::Error),
            _ => Err(format!("Unknown level: {}", s)),
        }
    }
}

/// One `contains` entry: a literal or a regex that must appear in the file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainsCondition {
    /// Match kind as written in the document (`static` or `regex`)
    #[serde(rename = "type")]
    pub kind: String,

    /// Literal text or regex pattern
    pub value: String,
}

impl ContainsCondition {
    pub fn new(kind: &str, value: &str) -> Self {
        Self {
            kind: kind.to_string(),
            value: value.to_string(),
        }
    }

    pub fn literal(value: &str) -> Self {
        Self::new("static", value)
    }

    pub fn regex(value: &str) -> Self {
        Self::new("regex", value)
    }
}

/// A condition entry as it appears in a rule-set document.
///
/// Each kind may appear at most once per entry. An entry expands into
/// [`Check`]s in a fixed order: path existence, containment, exclusion,
/// then reference resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_exists: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contains: Option<Vec<ContainsCondition>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_contains: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_reference_exist: Option<Vec<String>>,
}

impl Condition {
    pub fn path_exists() -> Self {
        Self {
            path_exists: Some(true),
            ..Self::default()
        }
    }

    pub fn contains(entries: Vec<ContainsCondition>) -> Self {
        Self {
            contains: Some(entries),
            ..Self::default()
        }
    }

    pub fn not_contains(patterns: &[&str]) -> Self {
        Self {
            not_contains: Some(patterns.iter().map(|p| p.to_string()).collect()),
            ..Self::default()
        }
    }

    pub fn check_reference_exist(patterns: &[&str]) -> Self {
        Self {
            check_reference_exist: Some(patterns.iter().map(|p| p.to_string()).collect()),
            ..Self::default()
        }
    }

    /// Expand into evaluation checks
    pub fn checks(&self) -> Result<Vec<Check>, EvalError> {
        let mut checks = Vec::new();

        if self.path_exists == Some(true) {
            checks.push(Check::PathExists);
        }

        if let Some(entries) = &self.contains {
            let parsed = entries
                .iter()
                .map(|entry| {
                    entry
                        .kind
                        .parse::<MatchKind>()
                        .map(|kind| (kind, entry.value.clone()))
                        .map_err(EvalError::Config)
                })
                .collect::<Result<Vec<_>, _>>()?;
            checks.push(Check::Contains(parsed));
        }

        if let Some(patterns) = &self.not_contains {
            checks.push(Check::NotContains(patterns.clone()));
        }

        if let Some(patterns) = &self.check_reference_exist {
            checks.push(Check::CheckReferenceExist(patterns.clone()));
        }

        Ok(checks)
    }
}

/// The files a rule applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A single relative path (file or directory)
    Path(String),
    /// An ordered list of relative file paths
    Files(Vec<String>),
}

impl Target {
    /// Build from the optional document fields. Both present yields the file
    /// list followed by the single path.
    pub fn from_parts(path: Option<&str>, files: Option<&[String]>) -> Option<Self> {
        match (path, files) {
            (None, None) => None,
            (Some(path), None) => Some(Target::Path(path.to_string())),
            (None, Some(files)) => Some(Target::Files(files.to_vec())),
            (Some(path), Some(files)) => {
                let mut all = files.to_vec();
                all.push(path.to_string());
                Some(Target::Files(all))
            }
        }
    }

    /// Relative paths in evaluation order
    pub fn relative_paths(&self) -> Vec<&str> {
        match self {
            Target::Path(path) => vec![path.as_str()],
            Target::Files(files) => files.iter().map(String::as_str).collect(),
        }
    }

    /// Join every relative path to the content root
    pub fn resolve(&self, content_root: &Path) -> Vec<ResolvedPath> {
        self.relative_paths()
            .into_iter()
            .map(|rel| ResolvedPath::new(content_root, rel))
            .collect()
    }
}

/// A target path in both of its forms
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// Path relative to the content root, used in evidence
    pub relative: String,
    /// Path joined to the content root, used for I/O
    pub absolute: PathBuf,
}

impl ResolvedPath {
    pub fn new(content_root: &Path, relative: &str) -> Self {
        let normalized = normalize_relative(relative);
        let absolute = content_root.join(&normalized);
        Self {
            relative: normalized,
            absolute,
        }
    }
}

/// Strip `./` segments and leading separators so the path stays under the root
pub(crate) fn normalize_relative(relative: &str) -> String {
    relative
        .split(['/', '\\'])
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// A lint rule definition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// What the rule enforces
    #[serde(default)]
    pub description: String,

    /// Single relative path the rule applies to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Relative file paths the rule applies to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,

    /// Ordered conditions, evaluated with short-circuit
    #[serde(default)]
    pub conditions: Vec<Condition>,

    /// Severity level
    #[serde(default)]
    pub level: Level,
}

impl Rule {
    /// Create a rule targeting a single path
    pub fn for_path(description: &str, path: &str, level: Level) -> Self {
        Self {
            description: description.to_string(),
            path: Some(path.to_string()),
            level,
            ..Self::default()
        }
    }

    /// Create a rule targeting a list of files
    pub fn for_files(description: &str, files: &[&str], level: Level) -> Self {
        Self {
            description: description.to_string(),
            files: Some(files.iter().map(|f| f.to_string()).collect()),
            level,
            ..Self::default()
        }
    }

    /// Append a condition
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// The rule's target, or a configuration error if it has none
    pub fn target(&self) -> Result<Target, EvalError> {
        Target::from_parts(self.path.as_deref(), self.files.as_deref())
            .ok_or_else(|| EvalError::Config("rule has no path or files in it".to_string()))
    }

    /// Flatten all condition entries into one ordered check list
    pub fn checks(&self) -> Result<Vec<Check>, EvalError> {
        if self.conditions.is_empty() {
            return Err(EvalError::Config("rule has no conditions".to_string()));
        }

        let mut checks = Vec::new();
        for (index, condition) in self.conditions.iter().enumerate() {
            let expanded = condition.checks()?;
            if expanded.is_empty() {
                return Err(EvalError::Config(format!(
                    "condition #{} has no recognized condition kind",
                    index + 1
                )));
            }
            checks.extend(expanded);
        }
        Ok(checks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_str() {
        assert_eq!("error".parse::<Level>().unwrap(), Level::Error);
        assert_eq!("WARN".parse::<Level>().unwrap(), Level::Warning);
        assert!("fatal".parse::<Level>().is_err());
    }

    #[test]
    fn test_target_from_parts() {
        assert_eq!(Target::from_parts(None, None), None);
        assert_eq!(
            Target::from_parts(Some("README.md"), None),
            Some(Target::Path("README.md".to_string()))
        );

        let files = vec!["a.md".to_string(), "b.md".to_string()];
        assert_eq!(
            Target::from_parts(Some("c.md"), Some(&files)),
            Some(Target::Files(vec![
                "a.md".to_string(),
                "b.md".to_string(),
                "c.md".to_string()
            ]))
        );
    }

    #[test]
    fn test_resolved_path_normalizes() {
        let resolved = ResolvedPath::new(Path::new("/repo"), "./blueprint/./index.md");
        assert_eq!(resolved.relative, "blueprint/index.md");
        assert_eq!(resolved.absolute, PathBuf::from("/repo/blueprint/index.md"));

        let rooted = ResolvedPath::new(Path::new("/repo"), "/README.md");
        assert_eq!(rooted.absolute, PathBuf::from("/repo/README.md"));
    }

    #[test]
    fn test_rule_without_target_is_config_error() {
        let rule = Rule {
            conditions: vec![Condition::path_exists()],
            ..Rule::default()
        };
        assert!(matches!(rule.target(), Err(EvalError::Config(_))));
    }

    #[test]
    fn test_rule_without_conditions_is_config_error() {
        let rule = Rule::for_path("empty", "README.md", Level::Error);
        assert!(matches!(rule.checks(), Err(EvalError::Config(_))));
    }

    #[test]
    fn test_condition_expansion_order() {
        let condition = Condition {
            path_exists: Some(true),
            contains: Some(vec![ContainsCondition::literal("x")]),
            not_contains: Some(vec!["TODO".to_string()]),
            check_reference_exist: Some(vec![r"\((.*)\)".to_string()]),
        };
        let checks = condition.checks().unwrap();
        assert_eq!(checks.len(), 4);
        assert!(matches!(checks[0], Check::PathExists));
        assert!(matches!(checks[1], Check::Contains(_)));
        assert!(matches!(checks[2], Check::NotContains(_)));
        assert!(matches!(checks[3], Check::CheckReferenceExist(_)));
    }

    #[test]
    fn test_path_exists_false_adds_no_check() {
        let condition = Condition {
            path_exists: Some(false),
            ..Condition::default()
        };
        assert!(condition.checks().unwrap().is_empty());

        let rule = Rule::for_path("noop", "README.md", Level::Warning).with_condition(condition);
        assert!(matches!(rule.checks(), Err(EvalError::Config(_))));
    }

    #[test]
    fn test_unknown_contains_kind_is_config_error() {
        let condition = Condition::contains(vec![ContainsCondition::new("glob", "*.md")]);
        assert!(matches!(condition.checks(), Err(EvalError::Config(_))));
    }

    #[test]
    fn test_deserialize_rule() {
        let json = r#"{
            "description": "Readme must exist",
            "path": "./README.md",
            "conditions": [{ "pathExists": true }],
            "level": "error"
        }"#;
        let rule: Rule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.level, Level::Error);
        assert_eq!(rule.path.as_deref(), Some("./README.md"));
        assert_eq!(rule.conditions, vec![Condition::path_exists()]);
    }
}
