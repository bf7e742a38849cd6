//! Condition evaluators
//!
//! Each evaluator is a pure function from resolved target paths and its own
//! parameters to a [`CheckOutcome`]. A failed check is a verdict about the
//! content; an [`EvalError`] means the verdict could not be reached.

mod contains;
mod not_contains;
mod path_exists;
mod reference;

pub use contains::evaluate_contains;
pub use not_contains::evaluate_not_contains;
pub use path_exists::evaluate_path_exists;
pub use reference::evaluate_reference_exist;

use crate::diagnostic::FileHighlight;
use crate::rule::ResolvedPath;
use regex::Regex;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error that prevents a rule from reaching a verdict
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("invalid rule: {0}")]
    Config(String),

    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot check whether {} exists: {source}", path.display())]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl EvalError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        EvalError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn stat(path: &Path, source: std::io::Error) -> Self {
        EvalError::Stat {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// How a `contains` entry matches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Literal substring
    Static,
    /// Regular expression over the whole file
    Regex,
}

impl std::str::FromStr for MatchKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "static" => Ok(MatchKind::Static),
            "regex" => Ok(MatchKind::Regex),
            _ => Err(format!("unknown contains type '{}'", s)),
        }
    }
}

/// One evaluable assertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Check {
    PathExists,
    Contains(Vec<(MatchKind, String)>),
    NotContains(Vec<String>),
    CheckReferenceExist(Vec<String>),
}

impl Check {
    /// Run this check against the resolved targets
    pub fn run(&self, targets: &[ResolvedPath]) -> Result<CheckOutcome, EvalError> {
        match self {
            Check::PathExists => evaluate_path_exists(targets),
            Check::Contains(entries) => evaluate_contains(targets, entries),
            Check::NotContains(patterns) => evaluate_not_contains(targets, patterns),
            Check::CheckReferenceExist(patterns) => evaluate_reference_exist(targets, patterns),
        }
    }
}

/// Verdict of a single check plus its evidence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckOutcome {
    pub passed: bool,
    pub highlights: Vec<FileHighlight>,
}

impl CheckOutcome {
    pub fn pass() -> Self {
        Self {
            passed: true,
            highlights: Vec::new(),
        }
    }
}

pub(crate) fn compile(pattern: &str) -> Result<Regex, EvalError> {
    Regex::new(pattern).map_err(|source| EvalError::Pattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// File content as text, with invalid UTF-8 sequences replaced by U+FFFD
pub(crate) fn read_content(target: &ResolvedPath) -> Result<String, EvalError> {
    let bytes = std::fs::read(&target.absolute).map_err(|e| EvalError::io(&target.absolute, e))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Whether `path` exists. A path running through a regular file does not.
pub(crate) fn path_exists(path: &Path) -> Result<bool, EvalError> {
    match std::fs::metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => Ok(false),
        Err(e) => Err(EvalError::stat(path, e)),
    }
}

/// 1-based line number of a byte offset
pub(crate) fn line_of_offset(content: &str, offset: usize) -> usize {
    content[..offset].matches('\n').count() + 1
}

/// Full text of the line containing a byte offset, without its terminator
pub(crate) fn line_at_offset(content: &str, offset: usize) -> &str {
    let start = content[..offset].rfind('\n').map_or(0, |i| i + 1);
    let end = content[offset..]
        .find('\n')
        .map_or(content.len(), |i| offset + i);
    content[start..end].trim_end_matches('\r')
}
