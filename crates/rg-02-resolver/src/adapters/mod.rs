//! # Adapters
//!
//! - `bus`: `ResolverPublisher` over a `MessageBus` request/ack
//! - `responder`: the resolver endpoint answering publications
//! - `memory`: in-memory `ClaimStore`

pub mod bus;
pub mod memory;
pub mod responder;
