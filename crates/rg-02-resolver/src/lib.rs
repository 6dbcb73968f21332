//! # Resolver Publication (RG-02)
//!
//! Pushes signed user claims to the resolver, and the resolver side that
//! accepts them.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): Signing and verifying `ClaimPublication`s
//! - **Ports Layer** (`ports/`): `ResolverPublisher` (inbound), `ClaimStore` (outbound)
//! - **Adapters** (`adapters/`): Bus publisher, bus responder, in-memory store
//!
//! ## Publication Flow
//!
//! ```text
//! Registration ──ClaimPublication──→ $SYS.REQ.CLAIMS.UPDATE ──→ [Resolver]
//!                                                                   │
//!                      verify operator ─ verify token ─ sub == claim_id
//!                                                                   │
//! Registration ←──────────────── PublicationAck {200|400|401} ──────┘
//! ```
//!
//! ## Security Notes
//!
//! - Only publications signed by a trusted operator key are stored
//! - The claim's subject must equal the claim ID it is stored under
//! - Storage is last-publish-wins per claim ID

pub mod adapters;
pub mod domain;
pub mod ports;

// Re-export public API
pub use adapters::bus::BusResolverPublisher;
pub use adapters::memory::InMemoryClaimStore;
pub use adapters::responder::ResolverResponder;
pub use domain::errors::{PublishError, Rejection};
pub use domain::publication::{sign_publication, verify_publication};
pub use ports::inbound::ResolverPublisher;
pub use ports::outbound::{ClaimStore, StoredClaim};

/// Default bound on waiting for a resolver acknowledgement.
pub const DEFAULT_PUBLISH_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(2);
