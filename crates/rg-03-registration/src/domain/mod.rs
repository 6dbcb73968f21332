//! # Domain Layer
//!
//! Error types and validated key material, no I/O.

pub mod errors;
pub mod keys;
