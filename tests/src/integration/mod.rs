//! # Integration Flows
//!
//! Registration from discovery to resolver storage, across all crates.

pub mod concurrency;
pub mod flows;
