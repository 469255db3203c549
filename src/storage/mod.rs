//! Persisted ledger state
//!
//! A `LedgerStore` is the complete ledger snapshot: the three registries
//! (records, counters, journals) plus store metadata, serialized as JSON.
//! Open the file → the ledger is exactly where the last save left it,
//! counters included.

pub mod backup;

use crate::registry::{ConstructRegistry, ExperimentRegistry, ProjectRegistry};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize)]
pub struct LedgerStore {
    pub projects: ProjectRegistry,
    pub constructs: ConstructRegistry,
    pub experiments: ExperimentRegistry,
    pub path: PathBuf,
    pub metadata: StoreMetadata,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StoreMetadata {
    pub owner: String,
    pub created_at: String,
}

impl LedgerStore {
    /// Open an existing store file, or start a fresh ledger if the file is
    /// missing or unreadable.
    pub fn open(path: impl AsRef<Path>, owner: &str) -> Self {
        let path = path.as_ref().to_path_buf();
        if path.exists() {
            if let Ok(data) = std::fs::read_to_string(&path) {
                if let Ok(store) = serde_json::from_str(&data) {
                    return store;
                }
            }
        }
        Self {
            projects: ProjectRegistry::new(),
            constructs: ConstructRegistry::new(),
            experiments: ExperimentRegistry::new(),
            path,
            metadata: StoreMetadata {
                owner: owner.to_string(),
                created_at: chrono::Utc::now().to_rfc3339(),
            },
        }
    }

    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    /// Serialized registry state only — metadata and file path excluded, so
    /// two stores holding the same records hash identically.
    pub fn state_json(&self) -> Result<String, serde_json::Error> {
        #[derive(Serialize)]
        struct StateView<'a> {
            projects: &'a ProjectRegistry,
            constructs: &'a ConstructRegistry,
            experiments: &'a ExperimentRegistry,
        }
        serde_json::to_string(&StateView {
            projects: &self.projects,
            constructs: &self.constructs,
            experiments: &self.experiments,
        })
    }

    /// SHA-256 over the canonical serialized registry state.
    pub fn checksum(&self) -> Result<String, serde_json::Error> {
        let state = self.state_json()?;
        Ok(hex::encode(Sha256::digest(state.as_bytes())))
    }

    /// Total records across all three registries.
    pub fn record_count(&self) -> usize {
        self.projects.len() + self.constructs.len() + self.experiments.len()
    }

    /// Applied transitions across all three journals.
    pub fn transition_count(&self) -> usize {
        self.projects.journal().len()
            + self.constructs.journal().len()
            + self.experiments.journal().len()
    }

    /// Verify every registry's journal chain.
    pub fn verify_journals(&self) -> bool {
        self.projects.journal().verify_chain()
            && self.constructs.journal().verify_chain()
            && self.experiments.journal().verify_chain()
    }

    pub fn summary(&self) -> String {
        let owners: Vec<String> = {
            let mut o: BTreeMap<&str, usize> = BTreeMap::new();
            for t in self.constructs.list() {
                *o.entry(t.owner.as_str()).or_default() += 1;
            }
            o.iter().map(|(owner, n)| format!("{}({})", owner, n)).collect()
        };
        format!(
            "LedgerStore '{}' | {} project(s), {} construct(s), {} experiment(s) | {} transition(s) | construct owners: {:?}",
            self.metadata.owner,
            self.projects.len(),
            self.constructs.len(),
            self.experiments.len(),
            self.transition_count(),
            owners
        )
    }
}
