//! # Adapters
//!
//! - `endpoint`: registration requests from the bus into [`crate::RegistrationApi`]
//! - `discovery`: public-key discovery responder
//! - `client`: the requesting side of the protocol

pub mod client;
pub mod discovery;
pub mod endpoint;
