//! # Shared Bus - Subject-Routed Message Bus
//!
//! Request/response messaging between the registration service, its clients
//! and the resolver.
//!
//! ## Request / Reply
//!
//! ```text
//! ┌──────────────┐  publish_request(subject, inbox)  ┌──────────────┐
//! │  Requester   │ ─────────────────────────────────→│  Responder   │
//! │              │                                    │              │
//! │  subscribe(  │ ←───────── respond(request) ──────│              │
//! │    inbox)    │                                    └──────────────┘
//! └──────────────┘
//! ```
//!
//! - Subjects are dot-separated tokens, filters support `*` and a trailing `>`
//! - Inboxes (`_INBOX.<uuid>`) are single-use reply subjects
//! - Delivery is best-effort; a request with no responder simply times out

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod message;
pub mod publisher;
pub mod subscriber;

use std::time::Duration;
use thiserror::Error;

// Re-export main types
pub use message::{Message, SubjectFilter};
pub use publisher::{InMemoryBus, MessageBus};
pub use subscriber::Subscription;

/// Maximum messages to buffer per subscriber before lagging.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

/// Prefix of every reply inbox subject.
pub const INBOX_PREFIX: &str = "_INBOX";

/// Errors from bus operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BusError {
    /// The bus was closed.
    #[error("Message bus closed")]
    Closed,

    /// No message arrived within the bound.
    #[error("Timed out after {waited:?} waiting on {subject}")]
    Timeout {
        /// Subject that was waited on.
        subject: String,
        /// How long the caller waited.
        waited: Duration,
    },

    /// Subject is empty, contains whitespace or misplaced wildcards.
    #[error("Invalid subject: {0:?}")]
    InvalidSubject(String),

    /// A response was attempted for a message without a reply subject.
    #[error("Message has no reply subject")]
    NoReplySubject,
}
