//! # Outbound Ports (Driven Ports / SPI)

use rg_01_claims::UserClaim;

/// A claim accepted by the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredClaim {
    /// The decoded claim.
    pub claim: UserClaim,
    /// The token as published.
    pub token: String,
    /// Operator that published it.
    pub operator: String,
}

/// Where the resolver keeps accepted claims.
pub trait ClaimStore: Send + Sync {
    /// Store `record` under `claim_id`, replacing any previous record.
    fn store(&self, claim_id: &str, record: StoredClaim);

    /// The current record for `claim_id`.
    fn lookup(&self, claim_id: &str) -> Option<StoredClaim>;

    /// Number of stored claim IDs.
    fn len(&self) -> usize;

    /// Whether nothing is stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
