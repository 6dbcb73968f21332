//! # Shared Crypto - Keys and Sealed Messages
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `keys` | Ed25519 | Role-tagged key pairs, text encoding, claim signing |
//! | `sealed` | X25519 + HKDF-SHA256 + XChaCha20-Poly1305 | Registration payloads and replies |
//!
//! ## Security Properties
//!
//! - **Ed25519**: Deterministic signatures, strict verification
//! - **Sealed**: Static-static key agreement binds sender and recipient
//! - **XChaCha20**: 192-bit random nonce per message
//! - Secret material is zeroized on drop

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod keys;
pub mod sealed;

// Re-exports
pub use errors::CryptoError;
pub use keys::{KeyPair, KeyRole};
pub use sealed::{open, seal};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
