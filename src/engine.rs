//! Core evaluation engine
//!
//! Rules are evaluated with a two-level fan-out on a rayon pool: one task per
//! rule group, and inside each group task one task per rule. Every rule task
//! sends exactly one [`RuleResult`] into a shared channel; the caller's thread
//! drains it, buckets the results and sorts them.

use crate::config::EngineConfig;
use crate::diagnostic::{EvaluationResult, RuleResult, RuleStatus};
use crate::progress::{NoopProgress, Progress};
use crate::rule::Rule;
use crate::ruleset::{RuleGroup, RuleSet};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use thiserror::Error;

/// Error that aborts a whole evaluation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("rule group id is blank")]
    BlankGroupId,

    #[error("{group}: content path is blank")]
    BlankContentPath { group: String },

    #[error("failed to start worker pool: {0}")]
    Pool(String),

    #[error("expected {expected} rule results but workers stopped after {received}")]
    Incomplete { expected: usize, received: usize },
}

/// What a worker sends back: a finished rule, or a group that could not start
pub type Completion = Result<RuleResult, DispatchError>;

/// Evaluate one rule against the content root.
///
/// Checks run in declared order. The first error or failure ends evaluation
/// and becomes the verdict; if every check passes the result carries the
/// evidence of the last one.
pub fn evaluate_rule(rule_id: &str, rule: &Rule, content_root: &Path) -> RuleResult {
    let mut result = RuleResult::new(rule_id, rule.level, &rule.description, RuleStatus::Passed);

    let plan = rule
        .target()
        .and_then(|target| rule.checks().map(|checks| (target, checks)));
    let (target, checks) = match plan {
        Ok(plan) => plan,
        Err(e) => return result.with_error(&e),
    };

    let targets = target.resolve(content_root);
    let mut highlights = Vec::new();

    for check in &checks {
        match check.run(&targets) {
            Err(e) => return result.with_error(&e),
            Ok(outcome) if !outcome.passed => {
                result.status = RuleStatus::Failed;
                return result.with_highlights(outcome.highlights);
            }
            Ok(outcome) => highlights = outcome.highlights,
        }
    }

    result.with_highlights(highlights)
}

/// Launch one task per rule of a group. Each task sends one result to
/// `sender` under the id `<group_id>_<rule_id>`.
///
/// Inputs are validated first; on error nothing is launched. Returns the
/// number of tasks launched.
pub fn dispatch_group(
    sender: &Sender<Completion>,
    group_id: &str,
    group: &RuleGroup,
    content_root: &Path,
    progress: &Arc<dyn Progress>,
) -> Result<usize, DispatchError> {
    check_dispatch(group_id, content_root)?;

    for (rule_id, rule) in &group.rules {
        let id = format!("{}_{}", group_id, rule_id);
        let rule = rule.clone();
        let root = content_root.to_path_buf();
        let tx = sender.clone();
        let progress = Arc::clone(progress);

        rayon::spawn(move || {
            let result = evaluate_rule(&id, &rule, &root);
            progress.rule_completed(&result);
            // The receiver is gone only if the run was aborted
            let _ = tx.send(Ok(result));
        });
    }

    progress.group_dispatched(group_id, group.rules.len());
    Ok(group.rules.len())
}

fn check_dispatch(group_id: &str, content_root: &Path) -> Result<(), DispatchError> {
    if group_id.trim().is_empty() {
        return Err(DispatchError::BlankGroupId);
    }

    if content_root.to_string_lossy().trim().is_empty() {
        return Err(DispatchError::BlankContentPath {
            group: group_id.to_string(),
        });
    }

    Ok(())
}

/// The main evaluation engine
pub struct Engine {
    /// Worker settings
    config: EngineConfig,

    /// Event sink
    progress: Arc<dyn Progress>,

    /// Repository identifier echoed in results (defaults to the content path)
    repo: Option<String>,
}

impl Engine {
    /// Create a new engine with configuration
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            progress: Arc::new(NoopProgress),
            repo: None,
        }
    }

    /// Report events to `progress`
    pub fn with_progress(mut self, progress: Arc<dyn Progress>) -> Self {
        self.progress = progress;
        self
    }

    /// Identify the repository in results by `repo` instead of its path
    pub fn with_repo(mut self, repo: &str) -> Self {
        self.repo = Some(repo.to_string());
        self
    }

    fn worker_count(&self) -> usize {
        if !self.config.parallel {
            1
        } else if self.config.jobs > 0 {
            self.config.jobs
        } else {
            num_cpus::get()
        }
    }

    /// Evaluate every rule of `rule_set` against `content_root`.
    ///
    /// The result holds each rule exactly once, bucketed by verdict and sorted
    /// by rule id. Group ids and the content path are checked before anything
    /// runs; a dispatch error from a running group returns immediately, and
    /// rules already running finish in the background with their results
    /// dropped.
    pub fn evaluate(
        &self,
        content_root: &Path,
        rule_set: &RuleSet,
    ) -> Result<EvaluationResult, DispatchError> {
        let total = rule_set.rule_count();
        let repo = self
            .repo
            .clone()
            .unwrap_or_else(|| content_root.display().to_string());
        self.progress.started(&repo, total);

        // Validate every group, including empty ones, before launching any
        for group_id in rule_set.rule_groups.keys() {
            check_dispatch(group_id, content_root)?;
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.worker_count())
            .build()
            .map_err(|e| DispatchError::Pool(e.to_string()))?;

        let (tx, rx) = mpsc::channel::<Completion>();

        for (group_id, group) in &rule_set.rule_groups {
            let tx = tx.clone();
            let group_id = group_id.clone();
            let group = group.clone();
            let root: PathBuf = content_root.to_path_buf();
            let progress = Arc::clone(&self.progress);

            pool.spawn(move || {
                if let Err(e) = dispatch_group(&tx, &group_id, &group, &root, &progress) {
                    let _ = tx.send(Err(e));
                }
            });
        }

        // Only worker-held senders remain, so a dead pool ends the loop below
        drop(tx);

        let mut result = EvaluationResult::new(&repo);
        for received in 0..total {
            match rx.recv() {
                Ok(Ok(rule_result)) => result.push(rule_result),
                Ok(Err(e)) => return Err(e),
                Err(_) => {
                    return Err(DispatchError::Incomplete {
                        expected: total,
                        received,
                    })
                }
            }
        }

        result.sort();
        self.progress.finished(&result);
        Ok(result)
    }
}
