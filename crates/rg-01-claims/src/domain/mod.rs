//! # Domain Layer
//!
//! Claim model and token encoding with no I/O dependencies.

pub mod entities;
pub mod errors;
pub mod token;
