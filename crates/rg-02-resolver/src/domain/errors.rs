//! # Resolver Errors

use rg_01_claims::ClaimError;
use shared_bus::BusError;
use shared_crypto::CryptoError;
use shared_types::PublicationAck;
use thiserror::Error;

/// Errors publishing a claim to the resolver.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PublishError {
    /// The operator key cannot sign publications.
    #[error("Operator key unusable: {0}")]
    OperatorKey(CryptoError),

    /// The publication body could not be encoded.
    #[error("Publication encoding failed: {0}")]
    Encode(String),

    /// The bus refused the request.
    #[error("Bus error: {0}")]
    Bus(BusError),

    /// No acknowledgement arrived in time.
    #[error("Resolver did not acknowledge within the timeout")]
    Timeout,

    /// The acknowledgement could not be decoded.
    #[error("Malformed resolver acknowledgement: {0}")]
    MalformedAck(String),

    /// The resolver refused the claim.
    #[error("Resolver rejected claim ({code}): {message}")]
    Rejected {
        /// Status code from the ack.
        code: u16,
        /// Detail from the ack.
        message: String,
    },
}

/// Why the resolver refused a publication.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Rejection {
    /// Body is not a `ClaimPublication`.
    #[error("malformed publication")]
    Malformed,

    /// Publishing key is not a trusted operator.
    #[error("operator {0} is not trusted")]
    UntrustedOperator(String),

    /// Operator signature does not verify.
    #[error("operator signature invalid")]
    BadOperatorSignature,

    /// The embedded token is invalid.
    #[error("invalid claim token: {0}")]
    InvalidToken(ClaimError),

    /// The token's subject differs from the claim ID.
    #[error("claim subject {subject} does not match claim id {claim_id}")]
    SubjectMismatch {
        /// Claim ID of the publication.
        claim_id: String,
        /// Subject inside the token.
        subject: String,
    },
}

impl Rejection {
    /// Status code reported back to the publisher.
    #[must_use]
    pub fn code(&self) -> u16 {
        match self {
            Self::UntrustedOperator(_) | Self::BadOperatorSignature => PublicationAck::UNAUTHORIZED,
            Self::Malformed | Self::InvalidToken(_) | Self::SubjectMismatch { .. } => {
                PublicationAck::BAD_REQUEST
            }
        }
    }

    /// The ack describing this rejection.
    #[must_use]
    pub fn to_ack(&self) -> PublicationAck {
        PublicationAck::rejected(self.code(), self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_codes() {
        assert_eq!(Rejection::UntrustedOperator("O".into()).code(), 401);
        assert_eq!(Rejection::BadOperatorSignature.code(), 401);
        assert_eq!(Rejection::Malformed.code(), 400);
        let ack = Rejection::SubjectMismatch {
            claim_id: "UA".into(),
            subject: "UB".into(),
        }
        .to_ack();
        assert_eq!(ack.code, 400);
        assert!(ack.message.contains("UB"));
    }
}
