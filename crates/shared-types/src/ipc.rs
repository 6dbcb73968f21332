//! # Wire Bodies
//!
//! JSON bodies carried on the bus. Byte fields are base64 strings.
//!
//! ```text
//! auth.register request   {"client_pub": "U...", "payload": "<base64>"}
//! auth.register reply     {"encrypted": "<base64>"}
//! resolver update         {"claim_id": "U...", "token": "...", "operator": "O...", "signature": "<base64>"}
//! resolver ack            {"code": 200, "message": "..."}
//! ```

use crate::errors::WireError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_with::base64::Base64;
use serde_with::serde_as;

/// A JSON body with named encode/decode helpers.
pub trait WireBody: Serialize + DeserializeOwned {
    /// Name used in error messages.
    const NAME: &'static str;

    /// Decode from JSON bytes.
    ///
    /// # Errors
    ///
    /// `WireError::Malformed` if the bytes are not this body.
    fn from_json(bytes: &[u8]) -> Result<Self, WireError> {
        serde_json::from_slice(bytes).map_err(|source| WireError::Malformed {
            body: Self::NAME,
            source,
        })
    }

    /// Encode to JSON bytes.
    ///
    /// # Errors
    ///
    /// `WireError::Encode` if serialization fails.
    fn to_json(&self) -> Result<Vec<u8>, WireError> {
        serde_json::to_vec(self).map_err(|source| WireError::Encode {
            body: Self::NAME,
            source,
        })
    }
}

// =============================================================================
// REGISTRATION
// =============================================================================

/// Registration request sent by a client.
/// Sender: client | Receiver: registration service
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    /// The client's encoded user public key.
    #[serde(rename = "client_pub")]
    pub client_public_key: String,
    /// Payload sealed from the client to the service.
    #[serde(rename = "payload")]
    #[serde_as(as = "Base64")]
    pub encrypted_payload: Vec<u8>,
}

impl WireBody for RegistrationRequest {
    const NAME: &'static str = "registration request";
}

/// Registration reply.
/// Sender: registration service | Receiver: client
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationResponse {
    /// Signed claim sealed from the service to the client.
    #[serde(rename = "encrypted")]
    #[serde_as(as = "Base64")]
    pub encrypted_claim: Vec<u8>,
}

impl WireBody for RegistrationResponse {
    const NAME: &'static str = "registration response";
}

// =============================================================================
// RESOLVER
// =============================================================================

/// Operator-authenticated claim publication.
/// Sender: registration service | Receiver: resolver
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimPublication {
    /// Key the claim is stored under (the subject's public key).
    pub claim_id: String,
    /// The encoded, signed claim.
    pub token: String,
    /// Encoded public key of the publishing operator.
    pub operator: String,
    /// Operator signature over [`ClaimPublication::signing_input`].
    #[serde_as(as = "Base64")]
    pub signature: Vec<u8>,
}

impl ClaimPublication {
    /// Bytes the operator signs: `claim_id || '\n' || token`.
    #[must_use]
    pub fn signing_input(claim_id: &str, token: &str) -> Vec<u8> {
        let mut input = Vec::with_capacity(claim_id.len() + 1 + token.len());
        input.extend_from_slice(claim_id.as_bytes());
        input.push(b'\n');
        input.extend_from_slice(token.as_bytes());
        input
    }
}

impl WireBody for ClaimPublication {
    const NAME: &'static str = "claim publication";
}

/// Resolver acknowledgement of a publication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationAck {
    /// HTTP-style status code; 200 means stored.
    pub code: u16,
    /// Human-readable detail.
    pub message: String,
}

impl PublicationAck {
    /// Status code of an accepted publication.
    pub const ACCEPTED: u16 = 200;
    /// Status code of a malformed or inconsistent publication.
    pub const BAD_REQUEST: u16 = 400;
    /// Status code of a publication from an untrusted or unverifiable operator.
    pub const UNAUTHORIZED: u16 = 401;

    /// An accepting ack.
    #[must_use]
    pub fn accepted(message: impl Into<String>) -> Self {
        Self {
            code: Self::ACCEPTED,
            message: message.into(),
        }
    }

    /// A rejecting ack.
    #[must_use]
    pub fn rejected(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Whether the claim was stored.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        self.code == Self::ACCEPTED
    }
}

impl WireBody for PublicationAck {
    const NAME: &'static str = "publication ack";
}
