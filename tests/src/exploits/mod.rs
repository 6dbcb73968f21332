//! # Attack Simulations
//!
//! Each scenario plays an attacker against a running deployment and checks
//! that the service fails closed: no reply, nothing stored, nothing leaked.

pub mod forged_requests;
pub mod rogue_publisher;
