//! BioLedger — deterministic registries for synthetic-biology records
//!
//! Append-oriented ledger records behind a collaborative bio-design
//! workflow: projects, ownership-transferable genetic-construct tokens,
//! and lab experiments. Every mutation is an authorization-checked,
//! all-or-nothing transition; every read is a point-in-time snapshot.

pub mod engine;
pub mod registry;
pub mod storage;

pub use engine::{is_authorized, IdAllocator, LedgerError, RecordKind, TransitionJournal};
pub use registry::{
    ConstructRegistry, ConstructToken, Experiment, ExperimentRegistry, ExperimentStatus,
    Project, ProjectRegistry, ProjectStatus, MAX_COLLABORATORS,
};
pub use storage::LedgerStore;
