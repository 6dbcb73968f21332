//! # Token Encoding
//!
//! Signing a [`UserClaim`] into a compact token and verifying it back.

use crate::domain::entities::{IssuedClaim, UserClaim};
use crate::domain::errors::ClaimError;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use shared_crypto::{KeyPair, KeyRole};
use std::time::{SystemTime, UNIX_EPOCH};

/// Value of the `alg` header field.
pub const TOKEN_ALGORITHM: &str = "ed25519-nkey";

/// Value of the `typ` header field.
const TOKEN_TYPE: &str = "JWT";

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    typ: String,
    alg: String,
}

/// Sign `claim` with the account key `issuer`.
///
/// Fills in `iss` from the issuer, `iat` with the current time when unset and
/// `jti` with a hash of the claim content.
///
/// # Errors
///
/// - `ClaimError::IssuerKey` if `issuer` is not a private account key
/// - `ClaimError::InvalidSubject` if the subject is not a user public key
/// - `ClaimError::Serialization` if encoding fails
pub fn sign_claim(mut claim: UserClaim, issuer: &KeyPair) -> Result<IssuedClaim, ClaimError> {
    issuer
        .require_role(KeyRole::Account)
        .map_err(ClaimError::IssuerKey)?;
    KeyPair::from_public_key_with_role(&claim.subject_public_key, KeyRole::User)
        .map_err(ClaimError::InvalidSubject)?;

    claim.issuer_public_key = issuer.public_key();
    if claim.iat == 0 {
        claim.iat = now_secs();
    }
    claim.jti = String::new();
    claim.jti = URL_SAFE_NO_PAD.encode(Sha256::digest(to_json(&claim)?));

    let header = Header {
        typ: TOKEN_TYPE.to_string(),
        alg: TOKEN_ALGORITHM.to_string(),
    };
    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(to_json(&header)?),
        URL_SAFE_NO_PAD.encode(to_json(&claim)?)
    );
    let signature = issuer
        .sign(signing_input.as_bytes())
        .map_err(ClaimError::IssuerKey)?;

    let token = format!("{signing_input}.{}", URL_SAFE_NO_PAD.encode(signature));
    Ok(IssuedClaim { claim, token })
}

/// Decode a token and verify its signature against the claim's issuer.
///
/// # Errors
///
/// - `ClaimError::MalformedToken` for bad structure or encoding
/// - `ClaimError::UnsupportedAlgorithm` for a foreign header
/// - `ClaimError::IssuerKey` / `InvalidSubject` for unusable keys in the claim
/// - `ClaimError::BadSignature` if the signature does not verify
pub fn decode_token(token: &str) -> Result<UserClaim, ClaimError> {
    let mut segments = token.split('.');
    let (Some(header_b64), Some(claim_b64), Some(signature_b64), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(ClaimError::MalformedToken("expected three segments".into()));
    };

    let header: Header = from_segment(header_b64, "header")?;
    if header.alg != TOKEN_ALGORITHM {
        return Err(ClaimError::UnsupportedAlgorithm(header.alg));
    }
    if header.typ != TOKEN_TYPE {
        return Err(ClaimError::MalformedToken(format!("unexpected type {}", header.typ)));
    }

    let claim: UserClaim = from_segment(claim_b64, "claim")?;
    let issuer = KeyPair::from_public_key_with_role(&claim.issuer_public_key, KeyRole::Account)
        .map_err(ClaimError::IssuerKey)?;
    KeyPair::from_public_key_with_role(&claim.subject_public_key, KeyRole::User)
        .map_err(ClaimError::InvalidSubject)?;

    let signature = URL_SAFE_NO_PAD
        .decode(signature_b64)
        .map_err(|e| ClaimError::MalformedToken(format!("signature: {e}")))?;
    let signing_input_len = header_b64.len() + 1 + claim_b64.len();
    issuer
        .verify(token[..signing_input_len].as_bytes(), &signature)
        .map_err(|_| ClaimError::BadSignature)?;

    Ok(claim)
}

fn to_json<T: Serialize>(value: &T) -> Result<Vec<u8>, ClaimError> {
    serde_json::to_vec(value).map_err(|e| ClaimError::Serialization(e.to_string()))
}

fn from_segment<T: for<'de> Deserialize<'de>>(segment: &str, what: &str) -> Result<T, ClaimError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| ClaimError::MalformedToken(format!("{what}: {e}")))?;
    serde_json::from_slice(&bytes).map_err(|e| ClaimError::MalformedToken(format!("{what}: {e}")))
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
