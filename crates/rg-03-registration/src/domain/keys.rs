//! # Service Key Material
//!
//! The three private keys a registration service runs with. Roles are
//! checked once here, so the handlers can use the keys without re-checking.

use shared_crypto::{CryptoError, KeyPair, KeyRole};
use std::sync::Arc;

/// Validated key set of one registration service instance.
#[derive(Debug, Clone)]
pub struct ServiceKeys {
    service: Arc<KeyPair>,
    operator: Arc<KeyPair>,
    account: Arc<KeyPair>,
}

impl ServiceKeys {
    /// Assemble a key set.
    ///
    /// # Errors
    ///
    /// - `CryptoError::UnexpectedRole` if a key has the wrong role
    ///   (service `Server`, operator `Operator`, account `Account`)
    /// - `CryptoError::PublicKeyOnly` if a key has no private half
    pub fn new(service: KeyPair, operator: KeyPair, account: KeyPair) -> Result<Self, CryptoError> {
        for (key, role) in [
            (&service, KeyRole::Server),
            (&operator, KeyRole::Operator),
            (&account, KeyRole::Account),
        ] {
            key.require_role(role)?;
            if !key.has_private_key() {
                return Err(CryptoError::PublicKeyOnly);
            }
        }

        Ok(Self {
            service: Arc::new(service),
            operator: Arc::new(operator),
            account: Arc::new(account),
        })
    }

    /// Key set with a fresh service key for this run.
    ///
    /// # Errors
    ///
    /// As [`ServiceKeys::new`].
    pub fn with_generated_service(operator: KeyPair, account: KeyPair) -> Result<Self, CryptoError> {
        Self::new(KeyPair::generate(KeyRole::Server), operator, account)
    }

    /// Service key; answers discovery and seals replies.
    #[must_use]
    pub fn service(&self) -> &Arc<KeyPair> {
        &self.service
    }

    /// Operator key; authenticates resolver publications.
    #[must_use]
    pub fn operator(&self) -> &Arc<KeyPair> {
        &self.operator
    }

    /// Account key; signs issued claims.
    #[must_use]
    pub fn account(&self) -> &Arc<KeyPair> {
        &self.account
    }
}
