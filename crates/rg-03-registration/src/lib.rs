//! # Client Registration (RG-03)
//!
//! A new client proves possession of a user key, exchanges sealed payloads
//! with the registration service and receives a signed claim that the
//! resolver already accepted.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): `RegistrationError`, `ClientError`, `ServiceKeys`
//! - **Ports Layer** (`ports/`): `RegistrationApi` (inbound); `ClaimIssuer` and
//!   `ResolverPublisher` (outbound)
//! - **Service Layer** (`service.rs`): `RegistrationService`
//! - **Adapters** (`adapters/`): bus endpoint, discovery responder, client
//!
//! ## Protocol
//!
//! ```text
//! Client                                   Service                     Resolver
//!   │── auth.pubkey ─────────────────────────→│                             │
//!   │←─────────────────────────── "N..." ─────│                             │
//!   │── auth.register {client_pub, payload} ─→│ open → issue                │
//!   │                                         │── ClaimPublication ────────→│
//!   │                                         │←────────────── ack 200 ─────│
//!   │←──────────────── {encrypted} ───────────│ seal                        │
//! ```
//!
//! ## Failure Semantics
//!
//! The service never replies with an error. Any failed step drops the
//! request and the client sees `ResponseTimeout`.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use adapters::client::{
    RegistrationClient, DEFAULT_DISCOVERY_TIMEOUT, DEFAULT_RESPONSE_TIMEOUT,
};
pub use adapters::discovery::DiscoveryResponder;
pub use adapters::endpoint::RegistrationEndpoint;
pub use domain::errors::{ClientError, RegistrationError};
pub use domain::keys::ServiceKeys;
pub use ports::inbound::{RegistrationApi, Registered};
pub use service::RegistrationService;
