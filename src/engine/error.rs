//! Ledger errors — returned as values, never thrown
//!
//! A failed operation leaves all state unchanged and the engine available.
//! Each variant maps to the numeric code the wire protocol expects.

use crate::engine::ident::RecordKind;
use serde::{Deserialize, Serialize};

/// Failure outcomes of mutating registry operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum LedgerError {
    /// Caller is not the record's owner/researcher.
    #[error("caller {caller} is not authorized over {kind} {id}")]
    Unauthorized { kind: RecordKind, id: u64, caller: String },

    /// A bounded set is already at its maximum capacity.
    #[error("{kind} {id} is at capacity ({limit})")]
    CapacityExceeded { kind: RecordKind, id: u64, limit: usize },

    /// The operation targets an identifier with no record behind it.
    #[error("{kind} {id} not found")]
    NotFound { kind: RecordKind, id: u64 },
}

impl LedgerError {
    /// Numeric protocol code carried alongside the error on the wire.
    pub fn code(&self) -> u16 {
        match self {
            LedgerError::Unauthorized { .. } => 403,
            LedgerError::CapacityExceeded { .. } => 401,
            LedgerError::NotFound { .. } => 404,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_codes() {
        let unauthorized = LedgerError::Unauthorized {
            kind: RecordKind::Project,
            id: 1,
            caller: "mallory".into(),
        };
        let capacity = LedgerError::CapacityExceeded {
            kind: RecordKind::Project,
            id: 1,
            limit: 10,
        };
        let missing = LedgerError::NotFound { kind: RecordKind::Experiment, id: 999 };

        assert_eq!(unauthorized.code(), 403);
        assert_eq!(capacity.code(), 401);
        assert_eq!(missing.code(), 404);
    }

    #[test]
    fn test_display_names_the_record() {
        let err = LedgerError::NotFound { kind: RecordKind::Construct, id: 7 };
        assert_eq!(err.to_string(), "construct 7 not found");
    }
}
