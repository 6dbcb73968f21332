//! # Registration Service
//!
//! Implements [`RegistrationApi`]: open the client's payload, issue a claim,
//! publish it, seal it back. Every step is terminal on failure.

use crate::domain::errors::RegistrationError;
use crate::domain::keys::ServiceKeys;
use crate::ports::inbound::{RegistrationApi, Registered};
use crate::ports::outbound::{ClaimIssuer, ResolverPublisher};
use async_trait::async_trait;
use shared_crypto::{open, seal, KeyPair, KeyRole};
use shared_types::{RegistrationRequest, RegistrationResponse, WireBody};
use std::sync::Arc;
use tracing::{debug, info};

/// The registration service.
///
/// Holds only read-only key material besides its two collaborators, so one
/// instance can serve any number of concurrent requests.
pub struct RegistrationService<I: ClaimIssuer, P: ResolverPublisher> {
    service_key: Arc<KeyPair>,
    operator_key: Arc<KeyPair>,
    issuer: I,
    publisher: P,
}

impl<I: ClaimIssuer, P: ResolverPublisher> RegistrationService<I, P> {
    /// Create a service from validated keys and its collaborators.
    pub fn new(keys: &ServiceKeys, issuer: I, publisher: P) -> Self {
        Self {
            service_key: Arc::clone(keys.service()),
            operator_key: Arc::clone(keys.operator()),
            issuer,
            publisher,
        }
    }

    /// The claim issuer.
    pub fn issuer(&self) -> &I {
        &self.issuer
    }

    /// The resolver publisher.
    pub fn publisher(&self) -> &P {
        &self.publisher
    }
}

#[async_trait]
impl<I: ClaimIssuer, P: ResolverPublisher> RegistrationApi for RegistrationService<I, P> {
    async fn register(&self, body: &[u8]) -> Result<Registered, RegistrationError> {
        // Step 1: Parse
        let request = RegistrationRequest::from_json(body)
            .map_err(|e| RegistrationError::MalformedRequest(e.to_string()))?;

        // Step 2: Resolve client identity
        let client =
            KeyPair::from_public_key_with_role(&request.client_public_key, KeyRole::User)
                .map_err(RegistrationError::InvalidClientKey)?;

        // Step 3: Decrypt
        let payload = open(&self.service_key, &client, &request.encrypted_payload)
            .map_err(RegistrationError::DecryptionFailure)?;
        debug!(
            client = %request.client_public_key,
            payload_len = payload.len(),
            "Registration payload opened"
        );

        // Step 4: Issue claim
        let issued = self
            .issuer
            .issue(&request.client_public_key)
            .map_err(RegistrationError::ClaimEncodingFailure)?;

        // Step 5: Publish; the reply exists only once the resolver accepted
        self.publisher
            .publish(&issued.token, &request.client_public_key, &self.operator_key)
            .await
            .map_err(RegistrationError::PublicationFailure)?;

        // Step 6: Encrypt reply
        let encrypted_claim = seal(&self.service_key, &client, issued.token.as_bytes())
            .map_err(RegistrationError::EncryptionFailure)?;
        let reply = RegistrationResponse { encrypted_claim }
            .to_json()
            .map_err(|e| RegistrationError::ResponseEncoding(e.to_string()))?;

        info!(
            client = %request.client_public_key,
            name = %issued.claim.name,
            "Client registered"
        );
        Ok(Registered {
            client_public_key: request.client_public_key,
            claim_name: issued.claim.name,
            payload,
            reply,
        })
    }

    fn service_public_key(&self) -> String {
        self.service_key.public_key()
    }
}
