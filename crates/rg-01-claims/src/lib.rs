//! # Claim Issuance (RG-01)
//!
//! Builds, signs and decodes the user claims handed to registered clients.
//!
//! ## Architecture
//!
//! This subsystem follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): Claim model and token encoding, no I/O
//! - **Ports Layer** (`ports/`): `ClaimIssuer` (inbound) and `NameSource` (outbound)
//! - **Service Layer** (`service.rs`): `AccountClaimIssuer`, signing with the account key
//!
//! ## Token Format
//!
//! ```text
//! base64url(header) "." base64url(claim JSON) "." base64url(Ed25519 signature)
//! ```
//!
//! The signature covers the first two segments and is made by the issuing
//! account key, whose public key is the claim's `iss`.

pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use domain::entities::{IssuedClaim, Limits, UserClaim, NO_LIMIT, REGISTERED_TAG};
pub use domain::errors::ClaimError;
pub use domain::token::{decode_token, sign_claim, TOKEN_ALGORITHM};
pub use ports::inbound::ClaimIssuer;
pub use ports::outbound::{NameSource, UuidNames};
pub use service::AccountClaimIssuer;
