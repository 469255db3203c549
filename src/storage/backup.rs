//! Versioned ledger snapshots with rollback
//!
//! Every snapshot captures the full serialized ledger, checksummed with
//! SHA-256 and tracked in a manifest. Restore rebuilds a `LedgerStore`
//! from any version; verification recomputes every checksum on disk.

use crate::storage::LedgerStore;
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

/// Metadata for a single ledger snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotMeta {
    pub version: u64,
    pub timestamp: DateTime<Utc>,
    pub checksum: String,
    pub size_bytes: u64,
    pub record_count: usize,
    pub transition_count: usize,
    pub description: String,
    pub filename: String,
}

/// Manifest tracking every snapshot in the backup directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupManifest {
    pub snapshots: Vec<SnapshotMeta>,
    pub next_version: u64,
    pub backup_dir: String,
}

impl BackupManifest {
    pub fn new(backup_dir: impl Into<String>) -> Self {
        Self {
            snapshots: Vec::new(),
            next_version: 1,
            backup_dir: backup_dir.into(),
        }
    }

    /// Load an existing manifest or create a new one.
    pub fn load_or_create(backup_dir: &str) -> Self {
        let manifest_path = Path::new(backup_dir).join("manifest.json");
        if manifest_path.exists() {
            if let Ok(json) = std::fs::read_to_string(&manifest_path) {
                if let Ok(manifest) = serde_json::from_str::<BackupManifest>(&json) {
                    info!("Loaded backup manifest with {} snapshot(s)", manifest.snapshots.len());
                    return manifest;
                }
            }
        }
        Self::new(backup_dir)
    }

    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        std::fs::create_dir_all(&self.backup_dir)?;
        let path = Path::new(&self.backup_dir).join("manifest.json");
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Snapshot/restore manager for a ledger's backup directory.
pub struct BackupManager {
    pub manifest: BackupManifest,
}

impl BackupManager {
    pub fn new(backup_dir: &str) -> Self {
        Self {
            manifest: BackupManifest::load_or_create(backup_dir),
        }
    }

    /// Snapshot the full ledger state into a new versioned file.
    pub fn snapshot(
        &mut self,
        store: &LedgerStore,
        description: &str,
    ) -> Result<SnapshotMeta, Box<dyn std::error::Error>> {
        std::fs::create_dir_all(&self.manifest.backup_dir)?;

        let data = serde_json::to_string_pretty(store)?;
        let version = self.manifest.next_version;
        let now = Utc::now();
        let filename = format!("ledger_v{:04}_{}.json", version, now.format("%Y%m%d_%H%M%S"));
        let filepath = Path::new(&self.manifest.backup_dir).join(&filename);

        let checksum = hex::encode(Sha256::digest(data.as_bytes()));
        std::fs::write(&filepath, &data)?;

        let meta = SnapshotMeta {
            version,
            timestamp: now,
            checksum,
            size_bytes: data.len() as u64,
            record_count: store.record_count(),
            transition_count: store.transition_count(),
            description: description.to_string(),
            filename,
        };

        self.manifest.snapshots.push(meta.clone());
        self.manifest.next_version += 1;
        self.manifest.save()?;

        info!(
            "Snapshot v{}: {} ({} records, {} transitions, {} bytes)",
            version,
            description,
            meta.record_count,
            meta.transition_count,
            data.len()
        );

        Ok(meta)
    }

    /// Rebuild a ledger from a snapshot version, verifying its checksum.
    pub fn restore(&self, version: u64) -> Result<LedgerStore, Box<dyn std::error::Error>> {
        let meta = self
            .manifest
            .snapshots
            .iter()
            .find(|s| s.version == version)
            .ok_or_else(|| format!("Snapshot v{} not found", version))?;

        let filepath = Path::new(&self.manifest.backup_dir).join(&meta.filename);
        let data = std::fs::read_to_string(&filepath)?;

        let checksum = hex::encode(Sha256::digest(data.as_bytes()));
        if checksum != meta.checksum {
            return Err(format!(
                "Checksum mismatch for v{}: expected {}, got {}",
                version, meta.checksum, checksum
            )
            .into());
        }

        let store: LedgerStore = serde_json::from_str(&data)?;
        info!(
            "Restored snapshot v{}: {} record(s), checksum OK",
            version,
            store.record_count()
        );
        Ok(store)
    }

    /// Rebuild the ledger from the most recent snapshot.
    pub fn restore_latest(&self) -> Result<LedgerStore, Box<dyn std::error::Error>> {
        let latest = self.manifest.snapshots.last().ok_or("No snapshots available")?;
        self.restore(latest.version)
    }

    pub fn list_snapshots(&self) -> &[SnapshotMeta] {
        &self.manifest.snapshots
    }

    pub fn snapshot_count(&self) -> usize {
        self.manifest.snapshots.len()
    }

    /// Recompute every snapshot checksum against the files on disk.
    pub fn verify_all(&self) -> Vec<(u64, bool)> {
        let mut results = Vec::new();
        for meta in &self.manifest.snapshots {
            let filepath = Path::new(&self.manifest.backup_dir).join(&meta.filename);
            let ok = if let Ok(data) = std::fs::read_to_string(&filepath) {
                let checksum = hex::encode(Sha256::digest(data.as_bytes()));
                checksum == meta.checksum
            } else {
                false
            };
            results.push((meta.version, ok));
        }
        results
    }

    /// Remove old snapshots keeping only the latest N.
    pub fn retain_latest(&mut self, keep: usize) -> Result<usize, Box<dyn std::error::Error>> {
        if self.manifest.snapshots.len() <= keep {
            return Ok(0);
        }

        let remove_count = self.manifest.snapshots.len() - keep;
        let to_remove: Vec<SnapshotMeta> = self.manifest.snapshots.drain(..remove_count).collect();

        for meta in &to_remove {
            let filepath = Path::new(&self.manifest.backup_dir).join(&meta.filename);
            let _ = std::fs::remove_file(filepath);
        }

        self.manifest.save()?;
        info!("Removed {} old snapshot(s), keeping latest {}", remove_count, keep);
        Ok(remove_count)
    }

    pub fn backup_dir(&self) -> &str {
        &self.manifest.backup_dir
    }

    pub fn total_size(&self) -> u64 {
        self.manifest.snapshots.iter().map(|s| s.size_bytes).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn test_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("bioledger-backup-test-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn populated_store(dir: &Path) -> LedgerStore {
        let mut store = LedgerStore::open(dir.join("ledger.json"), "lab");
        let p = store.projects.create_project("alice", "screen", "");
        store.projects.add_collaborator("alice", p, "bob").unwrap();
        let t = store.constructs.create_construct("alice", "prom", "", "TTGACA");
        store.experiments.create_experiment("bob", t, "PCR");
        store
    }

    #[test]
    fn test_snapshot_and_restore() {
        let dir = test_dir();
        let store = populated_store(&dir);
        let mut mgr = BackupManager::new(dir.to_str().unwrap());

        let meta = mgr.snapshot(&store, "after setup").unwrap();
        assert_eq!(meta.version, 1);
        assert_eq!(meta.record_count, 3);

        let restored = mgr.restore(1).unwrap();
        assert_eq!(restored.record_count(), 3);
        assert_eq!(restored.checksum().unwrap(), store.checksum().unwrap());
        assert!(restored.verify_journals());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_multiple_snapshots_restore_latest() {
        let dir = test_dir();
        let mut store = populated_store(&dir);
        let mut mgr = BackupManager::new(dir.to_str().unwrap());

        mgr.snapshot(&store, "first").unwrap();
        store.constructs.create_construct("alice", "extra", "", "GGCC");
        mgr.snapshot(&store, "second").unwrap();

        assert_eq!(mgr.snapshot_count(), 2);
        let restored = mgr.restore_latest().unwrap();
        assert_eq!(restored.constructs.len(), 2);

        // The older version still restores the older state.
        let older = mgr.restore(1).unwrap();
        assert_eq!(older.constructs.len(), 1);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_verify_detects_tampering() {
        let dir = test_dir();
        let store = populated_store(&dir);
        let mut mgr = BackupManager::new(dir.to_str().unwrap());

        let meta = mgr.snapshot(&store, "pristine").unwrap();
        assert_eq!(mgr.verify_all(), vec![(1, true)]);

        let filepath = dir.join(&meta.filename);
        std::fs::write(&filepath, "tampered").unwrap();
        assert_eq!(mgr.verify_all(), vec![(1, false)]);
        assert!(mgr.restore(1).is_err());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_retain_latest() {
        let dir = test_dir();
        let mut store = populated_store(&dir);
        let mut mgr = BackupManager::new(dir.to_str().unwrap());

        for i in 0..5 {
            store.constructs.create_construct("alice", &format!("c{}", i), "", "AT");
            mgr.snapshot(&store, &format!("v{}", i)).unwrap();
        }
        assert_eq!(mgr.snapshot_count(), 5);

        let removed = mgr.retain_latest(2).unwrap();
        assert_eq!(removed, 3);
        assert_eq!(mgr.snapshot_count(), 2);
        assert!(mgr.restore_latest().is_ok());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_restore_missing_version() {
        let dir = test_dir();
        let mgr = BackupManager::new(dir.to_str().unwrap());
        assert!(mgr.restore(42).is_err());
        assert!(mgr.restore_latest().is_err());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
