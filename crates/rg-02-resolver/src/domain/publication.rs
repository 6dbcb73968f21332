//! # Claim Publications
//!
//! The operator signs `claim_id || '\n' || token`; the resolver checks that
//! signature, the token's own signature, and that the token's subject is the
//! claim ID.

use crate::domain::errors::Rejection;
use rg_01_claims::{decode_token, UserClaim};
use shared_crypto::{CryptoError, KeyPair, KeyRole};
use shared_types::ClaimPublication;
use std::collections::HashSet;

/// Build a publication of `token` under `claim_id`, signed by `operator`.
///
/// # Errors
///
/// `CryptoError::UnexpectedRole` unless `operator` is an operator key,
/// `CryptoError::PublicKeyOnly` if it cannot sign.
pub fn sign_publication(
    token: &str,
    claim_id: &str,
    operator: &KeyPair,
) -> Result<ClaimPublication, CryptoError> {
    operator.require_role(KeyRole::Operator)?;
    let signature = operator.sign(&ClaimPublication::signing_input(claim_id, token))?;

    Ok(ClaimPublication {
        claim_id: claim_id.to_string(),
        token: token.to_string(),
        operator: operator.public_key(),
        signature: signature.to_vec(),
    })
}

/// Verify a publication against the set of trusted operator public keys.
///
/// # Errors
///
/// The [`Rejection`] describing the first failed check.
pub fn verify_publication(
    publication: &ClaimPublication,
    trusted_operators: &HashSet<String>,
) -> Result<UserClaim, Rejection> {
    if !trusted_operators.contains(&publication.operator) {
        return Err(Rejection::UntrustedOperator(publication.operator.clone()));
    }
    let operator = KeyPair::from_public_key_with_role(&publication.operator, KeyRole::Operator)
        .map_err(|_| Rejection::UntrustedOperator(publication.operator.clone()))?;
    operator
        .verify(
            &ClaimPublication::signing_input(&publication.claim_id, &publication.token),
            &publication.signature,
        )
        .map_err(|_| Rejection::BadOperatorSignature)?;

    let claim = decode_token(&publication.token).map_err(Rejection::InvalidToken)?;
    if claim.subject_public_key != publication.claim_id {
        return Err(Rejection::SubjectMismatch {
            claim_id: publication.claim_id.clone(),
            subject: claim.subject_public_key,
        });
    }
    Ok(claim)
}
