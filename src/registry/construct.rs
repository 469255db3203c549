//! Genetic construct tokens
//!
//! A construct token is an ownership-transferable record of a designed
//! biological sequence. The creator is fixed forever; the owner changes
//! only through `transfer`, and only when invoked by the current owner.
//! The `verified` flag belongs to an external verification authority and
//! has no mutation path in this registry.

use crate::engine::{is_authorized, IdAllocator, LedgerError, RecordKind, TransitionJournal};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An ownership-transferable genetic construct record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstructToken {
    pub id: u64,
    /// Immutable after creation.
    pub creator: String,
    /// Exactly one owner at any time; reassigned only via `transfer`.
    pub owner: String,
    pub name: String,
    pub description: String,
    /// Biological sequence text, e.g. "ATGGCTAGC...".
    pub sequence: String,
    pub verified: bool,
}

impl ConstructToken {
    pub fn summary(&self) -> String {
        format!(
            "Construct #{} '{}' | owner={} | {} bp | verified={}",
            self.id,
            self.name,
            self.owner,
            self.sequence.len(),
            self.verified
        )
    }
}

/// Registry for construct tokens: map + id allocator + transition journal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstructRegistry {
    tokens: BTreeMap<u64, ConstructToken>,
    ids: IdAllocator,
    journal: TransitionJournal,
}

impl ConstructRegistry {
    pub fn new() -> Self {
        Self {
            tokens: BTreeMap::new(),
            ids: IdAllocator::new(RecordKind::Construct),
            journal: TransitionJournal::new(RecordKind::Construct),
        }
    }

    /// Mint a construct token with creator = owner = `caller`. Always succeeds.
    pub fn create_construct(
        &mut self,
        caller: &str,
        name: &str,
        description: &str,
        sequence: &str,
    ) -> u64 {
        let id = self.ids.next_id();
        let token = ConstructToken {
            id,
            creator: caller.to_string(),
            owner: caller.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            sequence: sequence.to_string(),
            verified: false,
        };
        info!("Created {}", token.summary());
        self.tokens.insert(id, token);
        self.journal.record("create", id, caller, name);
        id
    }

    /// Point-in-time snapshot of a token. Never consults authorization.
    pub fn get_construct_data(&self, token_id: u64) -> Option<&ConstructToken> {
        self.tokens.get(&token_id)
    }

    /// Reassign ownership to `recipient`.
    ///
    /// Succeeds only when `caller` is `sender` and `sender` is the current
    /// recorded owner. A self-transfer (sender == recipient) is permitted.
    /// On any failure path the owner is unchanged.
    pub fn transfer(
        &mut self,
        caller: &str,
        token_id: u64,
        sender: &str,
        recipient: &str,
    ) -> Result<(), LedgerError> {
        let token = self
            .tokens
            .get_mut(&token_id)
            .ok_or(LedgerError::NotFound { kind: RecordKind::Construct, id: token_id })?;
        if !is_authorized(caller, sender) || !is_authorized(sender, &token.owner) {
            return Err(LedgerError::Unauthorized {
                kind: RecordKind::Construct,
                id: token_id,
                caller: caller.to_string(),
            });
        }
        token.owner = recipient.to_string();
        info!("Transferred construct #{}: {} -> {}", token_id, sender, recipient);
        self.journal.record("transfer", token_id, caller, recipient);
        Ok(())
    }

    /// Highest token id issued so far (0 if none).
    pub fn last_token_id(&self) -> u64 {
        self.ids.last_id()
    }

    /// All tokens in id order.
    pub fn list(&self) -> impl Iterator<Item = &ConstructToken> {
        self.tokens.values()
    }

    /// Tokens currently owned by `owner`, in id order.
    pub fn list_by_owner<'a>(&'a self, owner: &'a str) -> impl Iterator<Item = &'a ConstructToken> {
        self.tokens.values().filter(move |t| t.owner == owner)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn journal(&self) -> &TransitionJournal {
        &self.journal
    }
}

impl Default for ConstructRegistry {
    fn default() -> Self {
        Self::new()
    }
}
