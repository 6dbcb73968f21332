//! # Inbound Ports (Driving Ports / API)

use crate::domain::errors::PublishError;
use async_trait::async_trait;
use shared_crypto::KeyPair;

/// Submits signed claims to the resolver.
///
/// Publication is a single attempt; retry policy belongs to the caller.
#[async_trait]
pub trait ResolverPublisher: Send + Sync {
    /// Publish `token` under `claim_id`, authenticated with `issuer_key`.
    ///
    /// Returns only after the resolver accepted the claim.
    ///
    /// # Errors
    ///
    /// `PublishError` if the claim could not be sent, was not acknowledged in
    /// time, or was rejected.
    async fn publish(
        &self,
        token: &str,
        claim_id: &str,
        issuer_key: &KeyPair,
    ) -> Result<(), PublishError>;
}
