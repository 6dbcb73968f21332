//! # In-Memory Claim Store

use crate::ports::outbound::{ClaimStore, StoredClaim};
use parking_lot::RwLock;
use std::collections::HashMap;

/// `ClaimStore` backed by a `HashMap`. Last write wins per claim ID.
#[derive(Debug, Default)]
pub struct InMemoryClaimStore {
    claims: RwLock<HashMap<String, StoredClaim>>,
}

impl InMemoryClaimStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClaimStore for InMemoryClaimStore {
    fn store(&self, claim_id: &str, record: StoredClaim) {
        self.claims.write().insert(claim_id.to_string(), record);
    }

    fn lookup(&self, claim_id: &str) -> Option<StoredClaim> {
        self.claims.read().get(claim_id).cloned()
    }

    fn len(&self) -> usize {
        self.claims.read().len()
    }
}
