//! Collaborative design projects
//!
//! A project records an owner, a bounded collaborator list, and an open
//! status field. The owner is fixed at creation and is the only principal
//! allowed to mutate the record; collaborators are named but carry no
//! mutation rights at this layer.

use crate::engine::{is_authorized, IdAllocator, LedgerError, RecordKind, TransitionJournal};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Upper bound on the collaborator list of a single project.
pub const MAX_COLLABORATORS: usize = 10;

/// Lifecycle status of a project. No transition graph is enforced: the
/// owner may set any value after any other, including reverting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    Active,
    Completed,
    Cancelled,
}

impl ProjectStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(ProjectStatus::Active),
            "completed" => Some(ProjectStatus::Completed),
            "cancelled" => Some(ProjectStatus::Cancelled),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A collaborative design project record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    /// Immutable after creation.
    pub owner: String,
    pub name: String,
    pub description: String,
    pub status: ProjectStatus,
    /// Bounded by [`MAX_COLLABORATORS`]; insertion-ordered, no duplicates.
    /// The owner is implicitly privileged and need not appear here.
    pub collaborators: Vec<String>,
}

impl Project {
    pub fn summary(&self) -> String {
        format!(
            "Project #{} '{}' | owner={} | status={} | {} collaborator(s)",
            self.id,
            self.name,
            self.owner,
            self.status,
            self.collaborators.len()
        )
    }
}

/// Registry for project records: map + id allocator + transition journal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectRegistry {
    projects: BTreeMap<u64, Project>,
    ids: IdAllocator,
    journal: TransitionJournal,
}

impl ProjectRegistry {
    pub fn new() -> Self {
        Self {
            projects: BTreeMap::new(),
            ids: IdAllocator::new(RecordKind::Project),
            journal: TransitionJournal::new(RecordKind::Project),
        }
    }

    /// Create a project owned by `caller`. Always succeeds.
    pub fn create_project(&mut self, caller: &str, name: &str, description: &str) -> u64 {
        let id = self.ids.next_id();
        let project = Project {
            id,
            owner: caller.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            status: ProjectStatus::Active,
            collaborators: Vec::new(),
        };
        info!("Created {}", project.summary());
        self.projects.insert(id, project);
        self.journal.record("create", id, caller, name);
        id
    }

    /// Add `collaborator` to a project. Owner-only; idempotent; bounded.
    ///
    /// The ownership check runs before the capacity check, so a non-owner
    /// against a full project still gets 403.
    pub fn add_collaborator(
        &mut self,
        caller: &str,
        project_id: u64,
        collaborator: &str,
    ) -> Result<(), LedgerError> {
        let project = self
            .projects
            .get_mut(&project_id)
            .ok_or(LedgerError::NotFound { kind: RecordKind::Project, id: project_id })?;
        if !is_authorized(caller, &project.owner) {
            return Err(LedgerError::Unauthorized {
                kind: RecordKind::Project,
                id: project_id,
                caller: caller.to_string(),
            });
        }
        if project.collaborators.iter().any(|c| c == collaborator) {
            return Ok(());
        }
        if project.collaborators.len() >= MAX_COLLABORATORS {
            return Err(LedgerError::CapacityExceeded {
                kind: RecordKind::Project,
                id: project_id,
                limit: MAX_COLLABORATORS,
            });
        }
        project.collaborators.push(collaborator.to_string());
        self.journal.record("add-collaborator", project_id, caller, collaborator);
        Ok(())
    }

    /// Overwrite the status field. Owner-only; any value may follow any other.
    pub fn update_status(
        &mut self,
        caller: &str,
        project_id: u64,
        new_status: ProjectStatus,
    ) -> Result<(), LedgerError> {
        let project = self
            .projects
            .get_mut(&project_id)
            .ok_or(LedgerError::NotFound { kind: RecordKind::Project, id: project_id })?;
        if !is_authorized(caller, &project.owner) {
            return Err(LedgerError::Unauthorized {
                kind: RecordKind::Project,
                id: project_id,
                caller: caller.to_string(),
            });
        }
        project.status = new_status;
        self.journal.record("update-status", project_id, caller, new_status.name());
        Ok(())
    }

    /// Point-in-time snapshot of a project. Never consults authorization.
    pub fn get_project(&self, project_id: u64) -> Option<&Project> {
        self.projects.get(&project_id)
    }

    /// All projects in id order.
    pub fn list(&self) -> impl Iterator<Item = &Project> {
        self.projects.values()
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn journal(&self) -> &TransitionJournal {
        &self.journal
    }
}

impl Default for ProjectRegistry {
    fn default() -> Self {
        Self::new()
    }
}
