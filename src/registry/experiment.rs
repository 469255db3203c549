//! Laboratory experiment records
//!
//! An experiment links a researcher to a construct (by id only — a weak
//! reference, never validated for existence) and carries an immutable
//! protocol, an open status field, and an optional results payload. Only
//! the original researcher may mutate the record.

use crate::engine::{is_authorized, IdAllocator, LedgerError, RecordKind, TransitionJournal};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Lifecycle status of an experiment. Unrestricted transitions: the
/// researcher may set any value after any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExperimentStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl ExperimentStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ExperimentStatus::Pending),
            "in-progress" => Some(ExperimentStatus::InProgress),
            "completed" => Some(ExperimentStatus::Completed),
            "failed" => Some(ExperimentStatus::Failed),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ExperimentStatus::Pending => "pending",
            ExperimentStatus::InProgress => "in-progress",
            ExperimentStatus::Completed => "completed",
            ExperimentStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for ExperimentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A lab experiment record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Experiment {
    pub id: u64,
    /// Weak reference by value to a construct token id. May point at a
    /// token that does not exist yet or was transferred since.
    pub construct_id: u64,
    /// Immutable after creation.
    pub researcher: String,
    /// Immutable after creation.
    pub protocol: String,
    pub status: ExperimentStatus,
    /// Absent until submitted; later submissions overwrite.
    pub results: Option<String>,
}

impl Experiment {
    pub fn summary(&self) -> String {
        format!(
            "Experiment #{} | construct #{} | researcher={} | status={} | results={}",
            self.id,
            self.construct_id,
            self.researcher,
            self.status,
            if self.results.is_some() { "yes" } else { "none" }
        )
    }
}

/// Registry for experiment records: map + id allocator + transition journal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentRegistry {
    experiments: BTreeMap<u64, Experiment>,
    ids: IdAllocator,
    journal: TransitionJournal,
}

impl ExperimentRegistry {
    pub fn new() -> Self {
        Self {
            experiments: BTreeMap::new(),
            ids: IdAllocator::new(RecordKind::Experiment),
            journal: TransitionJournal::new(RecordKind::Experiment),
        }
    }

    /// Record a new experiment with researcher = `caller`. Always succeeds;
    /// `construct_id` is stored as given, with no existence check.
    pub fn create_experiment(&mut self, caller: &str, construct_id: u64, protocol: &str) -> u64 {
        let id = self.ids.next_id();
        let experiment = Experiment {
            id,
            construct_id,
            researcher: caller.to_string(),
            protocol: protocol.to_string(),
            status: ExperimentStatus::Pending,
            results: None,
        };
        info!("Created {}", experiment.summary());
        self.experiments.insert(id, experiment);
        self.journal.record("create", id, caller, protocol);
        id
    }

    /// Overwrite the status field. Researcher-only; any value may follow
    /// any other.
    pub fn update_status(
        &mut self,
        caller: &str,
        experiment_id: u64,
        new_status: ExperimentStatus,
    ) -> Result<(), LedgerError> {
        let experiment = self
            .experiments
            .get_mut(&experiment_id)
            .ok_or(LedgerError::NotFound { kind: RecordKind::Experiment, id: experiment_id })?;
        if !is_authorized(caller, &experiment.researcher) {
            return Err(LedgerError::Unauthorized {
                kind: RecordKind::Experiment,
                id: experiment_id,
                caller: caller.to_string(),
            });
        }
        experiment.status = new_status;
        self.journal.record("update-status", experiment_id, caller, new_status.name());
        Ok(())
    }

    /// Set the results payload, overwriting any prior value. Researcher-only.
    pub fn submit_results(
        &mut self,
        caller: &str,
        experiment_id: u64,
        results: &str,
    ) -> Result<(), LedgerError> {
        let experiment = self
            .experiments
            .get_mut(&experiment_id)
            .ok_or(LedgerError::NotFound { kind: RecordKind::Experiment, id: experiment_id })?;
        if !is_authorized(caller, &experiment.researcher) {
            return Err(LedgerError::Unauthorized {
                kind: RecordKind::Experiment,
                id: experiment_id,
                caller: caller.to_string(),
            });
        }
        experiment.results = Some(results.to_string());
        self.journal.record("submit-results", experiment_id, caller, results);
        Ok(())
    }

    /// Point-in-time snapshot of an experiment. Never consults authorization.
    pub fn get_experiment(&self, experiment_id: u64) -> Option<&Experiment> {
        self.experiments.get(&experiment_id)
    }

    /// All experiments in id order.
    pub fn list(&self) -> impl Iterator<Item = &Experiment> {
        self.experiments.values()
    }

    /// Experiments referencing `construct_id`, in id order.
    pub fn list_by_construct(&self, construct_id: u64) -> impl Iterator<Item = &Experiment> {
        self.experiments.values().filter(move |e| e.construct_id == construct_id)
    }

    pub fn len(&self) -> usize {
        self.experiments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.experiments.is_empty()
    }

    pub fn journal(&self) -> &TransitionJournal {
        &self.journal
    }
}

impl Default for ExperimentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_get_round_trip() {
        let mut registry = ExperimentRegistry::new();
        let id = registry.create_experiment("rosalind", 1, "PCR amplification, 30 cycles");

        let experiment = registry.get_experiment(id).unwrap();
        assert_eq!(experiment.construct_id, 1);
        assert_eq!(experiment.researcher, "rosalind");
        assert_eq!(experiment.protocol, "PCR amplification, 30 cycles");
        assert_eq!(experiment.status, ExperimentStatus::Pending);
        assert!(experiment.results.is_none());
    }

    #[test]
    fn test_construct_reference_is_not_validated() {
        let mut registry = ExperimentRegistry::new();
        // No construct registry in sight; the reference is a bare id.
        let id = registry.create_experiment("rosalind", 999, "protocol");
        assert_eq!(registry.get_experiment(id).unwrap().construct_id, 999);
    }

    #[test]
    fn test_update_status_by_researcher() {
        let mut registry = ExperimentRegistry::new();
        let id = registry.create_experiment("rosalind", 1, "protocol");
        registry.update_status("rosalind", id, ExperimentStatus::InProgress).unwrap();
        assert_eq!(registry.get_experiment(id).unwrap().status, ExperimentStatus::InProgress);
    }

    #[test]
    fn test_update_status_requires_researcher() {
        let mut registry = ExperimentRegistry::new();
        let id = registry.create_experiment("rosalind", 1, "protocol");
        let err = registry
            .update_status("mallory", id, ExperimentStatus::Completed)
            .unwrap_err();
        assert_eq!(err.code(), 403);
        assert_eq!(registry.get_experiment(id).unwrap().status, ExperimentStatus::Pending);
    }

    #[test]
    fn test_researcher_check_holds_in_every_status() {
        let mut registry = ExperimentRegistry::new();
        let id = registry.create_experiment("rosalind", 1, "protocol");
        for status in [
            ExperimentStatus::InProgress,
            ExperimentStatus::Completed,
            ExperimentStatus::Failed,
        ] {
            registry.update_status("rosalind", id, status).unwrap();
            assert_eq!(
                registry.update_status("mallory", id, ExperimentStatus::Pending).unwrap_err().code(),
                403
            );
            assert_eq!(
                registry.submit_results("mallory", id, "stolen").unwrap_err().code(),
                403
            );
        }
    }

    #[test]
    fn test_submit_results_overwrites() {
        let mut registry = ExperimentRegistry::new();
        let id = registry.create_experiment("rosalind", 1, "protocol");
        registry.submit_results("rosalind", id, "first pass: inconclusive").unwrap();
        registry.submit_results("rosalind", id, "second pass: 42 colonies").unwrap();
        assert_eq!(
            registry.get_experiment(id).unwrap().results.as_deref(),
            Some("second pass: 42 colonies")
        );
    }

    #[test]
    fn test_status_may_revert() {
        let mut registry = ExperimentRegistry::new();
        let id = registry.create_experiment("rosalind", 1, "protocol");
        registry.update_status("rosalind", id, ExperimentStatus::Completed).unwrap();
        registry.update_status("rosalind", id, ExperimentStatus::Pending).unwrap();
        assert_eq!(registry.get_experiment(id).unwrap().status, ExperimentStatus::Pending);
    }

    #[test]
    fn test_missing_experiment_operations() {
        let mut registry = ExperimentRegistry::new();
        registry.create_experiment("rosalind", 1, "protocol");
        assert!(registry.get_experiment(999).is_none());
        assert_eq!(
            registry.update_status("rosalind", 999, ExperimentStatus::Failed).unwrap_err().code(),
            404
        );
        assert_eq!(registry.submit_results("rosalind", 999, "r").unwrap_err().code(), 404);
    }

    #[test]
    fn test_list_by_construct() {
        let mut registry = ExperimentRegistry::new();
        registry.create_experiment("rosalind", 7, "a");
        registry.create_experiment("watson", 3, "b");
        registry.create_experiment("rosalind", 7, "c");
        assert_eq!(registry.list_by_construct(7).count(), 2);
        assert_eq!(registry.list_by_construct(3).count(), 1);
        assert_eq!(registry.list_by_construct(99).count(), 0);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(ExperimentStatus::parse("pending"), Some(ExperimentStatus::Pending));
        assert_eq!(ExperimentStatus::parse("in-progress"), Some(ExperimentStatus::InProgress));
        assert_eq!(ExperimentStatus::parse("completed"), Some(ExperimentStatus::Completed));
        assert_eq!(ExperimentStatus::parse("failed"), Some(ExperimentStatus::Failed));
        assert_eq!(ExperimentStatus::parse("aborted"), None);
    }
}
