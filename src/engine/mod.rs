//! Record state-machine engine — leaf components shared by every registry
//!
//! - **Identifier allocation**: per-record-kind monotonic counters
//! - **Authorization**: pure caller-equals-required predicate
//! - **Errors**: the value-returned failure taxonomy with protocol codes
//! - **Journal**: append-only hash-chained transition history

pub mod ident;
pub mod auth;
pub mod error;
pub mod journal;

pub use ident::{IdAllocator, RecordKind};
pub use auth::is_authorized;
pub use error::LedgerError;
pub use journal::{JournalEntry, TransitionJournal};
