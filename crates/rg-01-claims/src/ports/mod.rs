//! # Ports Layer
//!
//! - **Inbound (Driving)**: API the registration service calls
//! - **Outbound (Driven)**: Source of unique claim names

pub mod inbound;
pub mod outbound;
