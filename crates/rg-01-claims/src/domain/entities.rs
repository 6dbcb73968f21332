//! # Claim Entities

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Sentinel meaning "no limit" for any resource limit.
pub const NO_LIMIT: i64 = -1;

/// Tag attached to every claim minted by the registration service.
pub const REGISTERED_TAG: &str = "registered";

/// Claim type written into every user claim.
pub const USER_CLAIM_TYPE: &str = "user";

/// Claim schema version.
pub const CLAIM_VERSION: u8 = 2;

/// Resource limits granted to the subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    /// Maximum concurrent subscriptions.
    #[serde(rename = "subs")]
    pub max_subscriptions: i64,
    /// Maximum bytes in flight.
    #[serde(rename = "data")]
    pub max_data: i64,
    /// Maximum message payload size.
    #[serde(rename = "payload")]
    pub max_payload: i64,
}

impl Limits {
    /// Every limit set to [`NO_LIMIT`].
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_subscriptions: NO_LIMIT,
            max_data: NO_LIMIT,
            max_payload: NO_LIMIT,
        }
    }

    /// Whether every limit is [`NO_LIMIT`].
    #[must_use]
    pub fn is_unlimited(&self) -> bool {
        *self == Self::unlimited()
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::unlimited()
    }
}

/// A signed assertion authorizing a subject key.
///
/// `jti`, `iat` and `iss` are filled in when the claim is signed; values set
/// by the caller for `jti` and `iss` are overwritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserClaim {
    /// Content hash of the claim, unique per issuance.
    #[serde(default)]
    pub jti: String,
    /// Issue time, seconds since the Unix epoch.
    #[serde(default)]
    pub iat: u64,
    /// Encoded public key of the issuing account.
    #[serde(rename = "iss", default)]
    pub issuer_public_key: String,
    /// Encoded public key of the authorized user.
    #[serde(rename = "sub")]
    pub subject_public_key: String,
    /// Unique display name.
    pub name: String,
    /// Free-form tags.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Resource limits.
    #[serde(default)]
    pub limits: Limits,
    /// Claim type, always `"user"`.
    #[serde(rename = "type")]
    pub claim_type: String,
    /// Claim schema version.
    pub version: u8,
}

impl UserClaim {
    /// A new unsigned claim for `subject` with no tags and unlimited limits.
    #[must_use]
    pub fn new(subject_public_key: impl Into<String>) -> Self {
        Self {
            jti: String::new(),
            iat: 0,
            issuer_public_key: String::new(),
            subject_public_key: subject_public_key.into(),
            name: String::new(),
            tags: BTreeSet::new(),
            limits: Limits::unlimited(),
            claim_type: USER_CLAIM_TYPE.to_string(),
            version: CLAIM_VERSION,
        }
    }

    /// Set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Add a tag.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Replace the limits.
    #[must_use]
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Whether the claim carries `tag`.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

/// A signed claim together with its encoded token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedClaim {
    /// The claim as signed (with `jti`, `iat` and `iss` filled in).
    pub claim: UserClaim,
    /// The transportable signed token.
    pub token: String,
}
