//! # Ports Layer
//!
//! - **Inbound (Driving)**: `ResolverPublisher`, used by the registration service
//! - **Outbound (Driven)**: `ClaimStore`, where the resolver keeps accepted claims

pub mod inbound;
pub mod outbound;
