//! # Registration Client
//!
//! The requesting side: discover the service key, seal the payload, send
//! the request on a fresh inbox and open the sealed claim that comes back.
//! Every wait is bounded and nothing is retried.

use crate::domain::errors::ClientError;
use shared_bus::{BusError, MessageBus};
use shared_crypto::{open, seal, CryptoError, KeyPair, KeyRole};
use shared_types::{
    RegistrationRequest, RegistrationResponse, WireBody, DISCOVERY_SUBJECT, REGISTER_SUBJECT,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Default bound on the public-key query.
pub const DEFAULT_DISCOVERY_TIMEOUT: Duration = Duration::from_secs(1);

/// Default bound on the registration reply.
pub const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_secs(2);

/// Registers one user key with whatever service answers on the bus.
pub struct RegistrationClient<B: MessageBus> {
    bus: Arc<B>,
    key: KeyPair,
    discovery_subject: String,
    register_subject: String,
    discovery_timeout: Duration,
    response_timeout: Duration,
}

impl<B: MessageBus> RegistrationClient<B> {
    /// Client with a freshly generated user key.
    pub fn new(bus: Arc<B>) -> Self {
        Self {
            bus,
            key: KeyPair::generate(KeyRole::User),
            discovery_subject: DISCOVERY_SUBJECT.to_string(),
            register_subject: REGISTER_SUBJECT.to_string(),
            discovery_timeout: DEFAULT_DISCOVERY_TIMEOUT,
            response_timeout: DEFAULT_RESPONSE_TIMEOUT,
        }
    }

    /// Client registering an existing user key.
    ///
    /// # Errors
    ///
    /// `CryptoError` unless `key` is a private user key.
    pub fn with_key(bus: Arc<B>, key: KeyPair) -> Result<Self, CryptoError> {
        key.require_role(KeyRole::User)?;
        if !key.has_private_key() {
            return Err(CryptoError::PublicKeyOnly);
        }
        Ok(Self {
            key,
            ..Self::new(bus)
        })
    }

    /// Use different discovery and registration subjects.
    #[must_use]
    pub fn with_subjects(
        mut self,
        discovery: impl Into<String>,
        register: impl Into<String>,
    ) -> Self {
        self.discovery_subject = discovery.into();
        self.register_subject = register.into();
        self
    }

    /// Use different bounds for the two waits.
    #[must_use]
    pub fn with_timeouts(mut self, discovery: Duration, response: Duration) -> Self {
        self.discovery_timeout = discovery;
        self.response_timeout = response;
        self
    }

    /// The user public key this client registers.
    #[must_use]
    pub fn public_key(&self) -> String {
        self.key.public_key()
    }

    /// Ask the bus for the registration service key.
    ///
    /// # Errors
    ///
    /// - `ClientError::DiscoveryTimeout` if no service answers in time
    /// - `ClientError::InvalidServiceKey` if the answer is not a server key
    /// - `ClientError::SendError` if the bus refuses the query
    pub async fn discover_service_key(&self) -> Result<KeyPair, ClientError> {
        let reply = self
            .bus
            .request(&self.discovery_subject, Vec::new(), self.discovery_timeout)
            .await
            .map_err(|e| match e {
                BusError::Timeout { waited, .. } => ClientError::DiscoveryTimeout { waited },
                other => ClientError::SendError(other),
            })?;

        let text = String::from_utf8(reply.payload)
            .map_err(|_| ClientError::InvalidServiceKey("not UTF-8".into()))?;
        KeyPair::from_public_key_with_role(text.trim(), KeyRole::Server)
            .map_err(|e| ClientError::InvalidServiceKey(e.to_string()))
    }

    /// Register `payload` and return the decrypted claim token bytes.
    ///
    /// # Errors
    ///
    /// The [`ClientError`] of the first step that failed.
    pub async fn register(&self, payload: &[u8]) -> Result<Vec<u8>, ClientError> {
        let service = self.discover_service_key().await?;
        debug!(service = %service.public_key(), "Registration service discovered");

        let encrypted_payload =
            seal(&self.key, &service, payload).map_err(ClientError::EncryptionError)?;
        let body = RegistrationRequest {
            client_public_key: self.key.public_key(),
            encrypted_payload,
        }
        .to_json()
        .map_err(|e| ClientError::EncryptionError(CryptoError::EncryptionFailed(e.to_string())))?;

        // Subscribe before publishing so a fast reply is not lost
        let inbox = self.bus.new_inbox();
        let mut replies = self.bus.subscribe(&inbox).map_err(ClientError::SendError)?;
        self.bus
            .publish_request(&self.register_subject, &inbox, body)
            .await
            .map_err(ClientError::SendError)?;

        let reply = replies
            .next_timeout(self.response_timeout)
            .await
            .map_err(|e| match e {
                BusError::Timeout { waited, .. } => ClientError::ResponseTimeout { waited },
                other => ClientError::SendError(other),
            })?;

        let response = RegistrationResponse::from_json(&reply.payload)
            .map_err(|e| ClientError::MalformedResponse(e.to_string()))?;
        let claim = open(&self.key, &service, &response.encrypted_claim)
            .map_err(ClientError::DecryptionError)?;

        debug!(client = %self.key.public_key(), claim_len = claim.len(), "Registration complete");
        Ok(claim)
    }
}
