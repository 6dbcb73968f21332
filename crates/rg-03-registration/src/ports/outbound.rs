//! # Outbound Ports (Driven Ports / SPI)
//!
//! The registration service depends on two capabilities owned by other
//! subsystems:
//!
//! - [`ClaimIssuer`] (RG-01) mints and signs the user claim
//! - [`ResolverPublisher`] (RG-02) pushes it to the resolver and waits for acceptance

pub use rg_01_claims::ClaimIssuer;
pub use rg_02_resolver::ResolverPublisher;
