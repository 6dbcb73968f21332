//! # Shared Types Crate
//!
//! Wire bodies exchanged on the bus and the subjects they travel on.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All on-wire shapes are defined here.
//! - **Opaque Ciphertext**: Encrypted fields are plain bytes (base64 in JSON);
//!   nothing in this crate knows how they were produced.
//! - **JSON on the Wire**: Every body is a JSON object.

pub mod errors;
pub mod ipc;
pub mod subjects;

pub use errors::*;
pub use ipc::*;
pub use subjects::*;
