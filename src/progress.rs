//! Progress reporting for the engine
//!
//! The engine never logs directly; it reports through a [`Progress`] handed
//! to it at construction. [`LogProgress`] forwards to the `log` facade and
//! [`NoopProgress`] discards everything.

use crate::diagnostic::{EvaluationResult, RuleResult, RuleStatus};

/// Receiver of engine events. Called from worker threads.
pub trait Progress: Send + Sync {
    /// A run is starting
    fn started(&self, _content_root: &str, _total_rules: usize) {}

    /// A group's rules were handed to the pool
    fn group_dispatched(&self, _group_id: &str, _rule_count: usize) {}

    /// A rule finished evaluating
    fn rule_completed(&self, _result: &RuleResult) {}

    /// All results were collected and sorted
    fn finished(&self, _result: &EvaluationResult) {}
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl Progress for NoopProgress {}

/// Reports events through the `log` crate
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl Progress for LogProgress {
    fn started(&self, content_root: &str, total_rules: usize) {
        log::info!("evaluating {} rules against {}", total_rules, content_root);
    }

    fn group_dispatched(&self, group_id: &str, rule_count: usize) {
        log::debug!("group {}: dispatched {} rules", group_id, rule_count);
    }

    fn rule_completed(&self, result: &RuleResult) {
        match (&result.status, &result.error) {
            (RuleStatus::Errored, Some(err)) => log::warn!("{}", err),
            (status, _) => log::debug!(
                "rule {}: {:?} ({} highlights)",
                result.id,
                status,
                result.file_highlights.len()
            ),
        }
    }

    fn finished(&self, result: &EvaluationResult) {
        log::info!(
            "{} passed, {} failed, {} errored",
            result.success.len(),
            result.failed.len(),
            result.error.len()
        );
    }
}
