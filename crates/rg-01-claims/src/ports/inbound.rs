//! # Inbound Ports (Driving Ports / API)

use crate::domain::entities::IssuedClaim;
use crate::domain::errors::ClaimError;

/// Mints signed claims for newly registered users.
///
/// Implementations must be thread-safe (`Send + Sync`); the registration
/// service calls `issue` from many handler tasks at once.
pub trait ClaimIssuer: Send + Sync {
    /// Issue a signed claim authorizing `subject_public_key`.
    ///
    /// Every call yields a claim with a distinct name, also for a repeated
    /// subject.
    ///
    /// # Errors
    ///
    /// `ClaimError` if the subject is invalid or signing fails.
    fn issue(&self, subject_public_key: &str) -> Result<IssuedClaim, ClaimError>;

    /// Encoded public key of the issuing account.
    fn issuer_public_key(&self) -> String;
}
