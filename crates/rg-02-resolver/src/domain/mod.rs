//! # Domain Layer
//!
//! Publication signing and verification, no I/O.

pub mod errors;
pub mod publication;
