//! # Inbound Ports (Driving Ports / API)

use crate::domain::errors::RegistrationError;
use async_trait::async_trait;

/// Outcome of one successful registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registered {
    /// The registered user public key.
    pub client_public_key: String,
    /// Name of the claim issued for it.
    pub claim_name: String,
    /// Decrypted application payload sent by the client.
    pub payload: Vec<u8>,
    /// Encoded `RegistrationResponse` to send back.
    pub reply: Vec<u8>,
}

/// Processes registration requests.
///
/// Implementations must be thread-safe; the endpoint runs one task per
/// request.
#[async_trait]
pub trait RegistrationApi: Send + Sync {
    /// Process one request body end to end.
    ///
    /// On success the claim has been accepted by the resolver and the
    /// returned reply is ready to send.
    ///
    /// # Errors
    ///
    /// `RegistrationError` naming the step that failed. The caller must not
    /// reply in that case.
    async fn register(&self, body: &[u8]) -> Result<Registered, RegistrationError>;

    /// Encoded public key clients seal their payloads to.
    fn service_public_key(&self) -> String;
}
