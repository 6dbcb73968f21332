//! # Ports Layer
//!
//! - **Inbound (Driving)**: `RegistrationApi`, driven by the bus endpoint
//! - **Outbound (Driven)**: claim issuance and resolver publication

pub mod inbound;
pub mod outbound;
