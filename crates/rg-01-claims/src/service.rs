//! # Claim Issuance Service
//!
//! Implements [`ClaimIssuer`] with a private account key.

use crate::domain::entities::{IssuedClaim, Limits, UserClaim, REGISTERED_TAG};
use crate::domain::errors::ClaimError;
use crate::domain::token::sign_claim;
use crate::ports::inbound::ClaimIssuer;
use crate::ports::outbound::{NameSource, UuidNames};
use shared_crypto::{CryptoError, KeyPair, KeyRole};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// Issues claims signed by a single account key.
///
/// Every claim is tagged `"registered"` and has unlimited limits unless the
/// defaults are replaced with [`AccountClaimIssuer::with_tags`] or
/// [`AccountClaimIssuer::with_limits`].
pub struct AccountClaimIssuer<N: NameSource = UuidNames> {
    account: Arc<KeyPair>,
    names: N,
    tags: BTreeSet<String>,
    limits: Limits,
}

impl AccountClaimIssuer<UuidNames> {
    /// Create an issuer with random claim names.
    ///
    /// # Errors
    ///
    /// `ClaimError::IssuerKey` unless `account` is a private account key. A
    /// service must not start with an issuer that cannot sign.
    pub fn new(account: Arc<KeyPair>) -> Result<Self, ClaimError> {
        Self::with_names(account, UuidNames)
    }
}

impl<N: NameSource> AccountClaimIssuer<N> {
    /// Create an issuer with a custom name source.
    ///
    /// # Errors
    ///
    /// `ClaimError::IssuerKey` unless `account` is a private account key.
    pub fn with_names(account: Arc<KeyPair>, names: N) -> Result<Self, ClaimError> {
        account
            .require_role(KeyRole::Account)
            .map_err(ClaimError::IssuerKey)?;
        if !account.has_private_key() {
            return Err(ClaimError::IssuerKey(CryptoError::PublicKeyOnly));
        }

        Ok(Self {
            account,
            names,
            tags: BTreeSet::from([REGISTERED_TAG.to_string()]),
            limits: Limits::unlimited(),
        })
    }

    /// Replace the tags attached to issued claims.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the limits granted by issued claims.
    #[must_use]
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }
}

impl<N: NameSource> ClaimIssuer for AccountClaimIssuer<N> {
    fn issue(&self, subject_public_key: &str) -> Result<IssuedClaim, ClaimError> {
        let mut claim = UserClaim::new(subject_public_key)
            .with_name(self.names.next_name())
            .with_limits(self.limits);
        claim.tags = self.tags.clone();

        let issued = sign_claim(claim, &self.account)?;
        debug!(
            subject = %issued.claim.subject_public_key,
            name = %issued.claim.name,
            jti = %issued.claim.jti,
            "Claim issued"
        );
        Ok(issued)
    }

    fn issuer_public_key(&self) -> String {
        self.account.public_key()
    }
}
