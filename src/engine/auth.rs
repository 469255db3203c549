//! Authorization — a stateless predicate over principals
//!
//! The required principal is always the record's own recorded owner or
//! researcher field, never a separate ACL. Reads never come through here.

/// True iff `caller` is exactly the required principal.
pub fn is_authorized(caller: &str, required: &str) -> bool {
    caller == required
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_is_authorized() {
        assert!(is_authorized("alice", "alice"));
    }

    #[test]
    fn test_other_principal_is_denied() {
        assert!(!is_authorized("mallory", "alice"));
        assert!(!is_authorized("", "alice"));
        assert!(!is_authorized("Alice", "alice"));
    }
}
