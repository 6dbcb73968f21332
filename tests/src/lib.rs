//! # Registrar Test Suite
//!
//! Cross-crate scenarios that wire the claim issuer, the resolver and the
//! registration service onto one in-memory bus and drive them with real
//! clients.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Deployment harness shared by every scenario
//! ├── integration/      # Registration flows end to end
//! │   ├── flows.rs
//! │   └── concurrency.rs
//! └── exploits/         # Attack simulations against the protocol
//!     ├── forged_requests.rs
//!     └── rogue_publisher.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p rg-tests
//! cargo test -p rg-tests integration::
//! cargo test -p rg-tests exploits::
//! ```

#[cfg(test)]
pub mod fixtures;

pub mod exploits;
pub mod integration;
