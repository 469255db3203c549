//! Transition journal — append-only hash-chained history per registry
//!
//! Every successful mutation appends one entry; failed operations never
//! touch the journal. The chain hash covers only deterministic fields, so
//! replaying the same operation sequence yields the same root hash on any
//! machine. Wall-clock timestamps are recorded for operators but stay out
//! of the hashes.

use crate::engine::ident::RecordKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// One applied transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Position in this registry's history (1-based).
    pub seq: u64,
    /// Operation name, e.g. "create", "transfer", "update-status".
    pub op: String,
    /// Identifier of the record the transition touched.
    pub record_id: u64,
    /// Principal that invoked the operation.
    pub actor: String,
    /// Short free-form detail, e.g. the new status value.
    pub note: String,
    /// When the entry was appended. Not part of any hash.
    pub timestamp: DateTime<Utc>,
    /// Chained hash of this entry over the previous root.
    pub state_hash: String,
}

/// Ordered, hash-chained record of every applied transition in one registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionJournal {
    kind: RecordKind,
    root_hash: String,
    entries: Vec<JournalEntry>,
}

impl TransitionJournal {
    /// Empty journal; the genesis root is derived from the record kind alone.
    pub fn new(kind: RecordKind) -> Self {
        Self {
            kind,
            root_hash: Self::genesis_hash(kind),
            entries: Vec::new(),
        }
    }

    /// Append a successful transition and advance the root hash.
    pub fn record(&mut self, op: &str, record_id: u64, actor: &str, note: &str) {
        let seq = self.entries.len() as u64 + 1;
        let state_hash = Self::chain_hash(&self.root_hash, seq, op, record_id, actor, note);
        self.entries.push(JournalEntry {
            seq,
            op: op.to_string(),
            record_id,
            actor: actor.to_string(),
            note: note.to_string(),
            timestamp: Utc::now(),
            state_hash: state_hash.clone(),
        });
        self.root_hash = state_hash;
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    /// Current root of the chain.
    pub fn root_hash(&self) -> &str {
        &self.root_hash
    }

    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Recompute the whole chain from genesis and compare it to the stored
    /// hashes. False if any entry or the root was altered.
    pub fn verify_chain(&self) -> bool {
        let mut prev = Self::genesis_hash(self.kind);
        for (i, entry) in self.entries.iter().enumerate() {
            if entry.seq != i as u64 + 1 {
                return false;
            }
            let expected = Self::chain_hash(
                &prev,
                entry.seq,
                &entry.op,
                entry.record_id,
                &entry.actor,
                &entry.note,
            );
            if entry.state_hash != expected {
                return false;
            }
            prev = expected;
        }
        prev == self.root_hash
    }

    fn genesis_hash(kind: RecordKind) -> String {
        let mut hasher = Sha256::new();
        hasher.update(b"genesis");
        hasher.update(kind.name().as_bytes());
        hex::encode(hasher.finalize())
    }

    fn chain_hash(
        prev_hash: &str,
        seq: u64,
        op: &str,
        record_id: u64,
        actor: &str,
        note: &str,
    ) -> String {
        let mut hasher = Sha256::new();
        hasher.update(prev_hash.as_bytes());
        hasher.update(seq.to_le_bytes());
        hasher.update(op.as_bytes());
        hasher.update(record_id.to_le_bytes());
        hasher.update(actor.as_bytes());
        hasher.update(note.as_bytes());
        hex::encode(hasher.finalize())
    }
}
