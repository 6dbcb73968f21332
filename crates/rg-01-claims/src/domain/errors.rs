//! # Claim Errors

use shared_crypto::CryptoError;
use thiserror::Error;

/// Errors that can occur while issuing or decoding a claim.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClaimError {
    /// Issuer key is not a private account key.
    #[error("Issuer key unusable: {0}")]
    IssuerKey(CryptoError),

    /// Subject is not a valid user public key.
    #[error("Invalid claim subject: {0}")]
    InvalidSubject(CryptoError),

    /// Claim or header could not be serialized.
    #[error("Claim serialization failed: {0}")]
    Serialization(String),

    /// Token does not have the expected three-segment shape or content.
    #[error("Malformed token: {0}")]
    MalformedToken(String),

    /// Token header names an algorithm other than ours.
    #[error("Unsupported token algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Token signature does not verify against the claim's issuer.
    #[error("Token signature invalid")]
    BadSignature,
}
