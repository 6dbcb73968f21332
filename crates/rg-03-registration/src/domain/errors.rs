//! # Registration Errors
//!
//! `RegistrationError` is what the service logs before dropping a request;
//! it never travels back to the client. `ClientError` is what the client
//! returns to its caller.

use rg_01_claims::ClaimError;
use rg_02_resolver::PublishError;
use shared_bus::BusError;
use shared_crypto::CryptoError;
use std::time::Duration;
use thiserror::Error;

/// Why the service dropped a registration request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistrationError {
    /// The body is not a registration request.
    #[error("Malformed registration request: {0}")]
    MalformedRequest(String),

    /// `client_pub` is not a valid user public key.
    #[error("Invalid client key: {0}")]
    InvalidClientKey(CryptoError),

    /// The payload did not open with the service and client keys.
    #[error("Payload decryption failed: {0}")]
    DecryptionFailure(CryptoError),

    /// The claim could not be built or signed.
    #[error("Claim encoding failed: {0}")]
    ClaimEncodingFailure(ClaimError),

    /// The resolver did not accept the claim.
    #[error("Claim publication failed: {0}")]
    PublicationFailure(PublishError),

    /// The claim could not be sealed for the client.
    #[error("Reply encryption failed: {0}")]
    EncryptionFailure(CryptoError),

    /// The reply body could not be encoded.
    #[error("Reply encoding failed: {0}")]
    ResponseEncoding(String),
}

impl RegistrationError {
    /// Short, stable label for log fields.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedRequest(_) => "malformed_request",
            Self::InvalidClientKey(_) => "invalid_client_key",
            Self::DecryptionFailure(_) => "decryption_failure",
            Self::ClaimEncodingFailure(_) => "claim_encoding_failure",
            Self::PublicationFailure(_) => "publication_failure",
            Self::EncryptionFailure(_) => "encryption_failure",
            Self::ResponseEncoding(_) => "response_encoding",
        }
    }
}

/// Errors returned by the registration client.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    /// No service answered the public-key query in time.
    #[error("No registration service answered within {waited:?}")]
    DiscoveryTimeout {
        /// Discovery bound that expired.
        waited: Duration,
    },

    /// The discovery reply is not a server public key.
    #[error("Invalid service key: {0}")]
    InvalidServiceKey(String),

    /// The payload could not be sealed for the service.
    #[error("Payload encryption failed: {0}")]
    EncryptionError(CryptoError),

    /// The bus refused the request, or closed before a reply arrived.
    #[error("Failed to send registration request: {0}")]
    SendError(BusError),

    /// No reply arrived in time.
    #[error("No registration reply within {waited:?}")]
    ResponseTimeout {
        /// Response bound that expired.
        waited: Duration,
    },

    /// The reply body is not a registration response.
    #[error("Malformed registration response: {0}")]
    MalformedResponse(String),

    /// The reply did not open with the client and service keys.
    #[error("Reply decryption failed: {0}")]
    DecryptionError(CryptoError),
}
