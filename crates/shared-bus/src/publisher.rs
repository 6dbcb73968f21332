//! # Message Bus
//!
//! Defines the publishing side of the bus and the in-memory implementation.

use crate::message::{validate_subject, Message, SubjectFilter};
use crate::subscriber::Subscription;
use crate::{BusError, DEFAULT_CHANNEL_CAPACITY, INBOX_PREFIX};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tracing::{debug, warn};
use uuid::Uuid;

/// Request/response messaging with subjects and reply inboxes.
///
/// This is the interface the registration service, client and resolver use;
/// none of them depend on a concrete transport.
#[async_trait]
pub trait MessageBus: Send + Sync {
    /// Publish a message with no reply subject.
    ///
    /// # Returns
    ///
    /// The number of active subscriptions the message was offered to.
    async fn publish(&self, subject: &str, payload: Vec<u8>) -> Result<usize, BusError>;

    /// Publish a message that asks to be answered on `reply`.
    async fn publish_request(
        &self,
        subject: &str,
        reply: &str,
        payload: Vec<u8>,
    ) -> Result<usize, BusError>;

    /// Subscribe to a subject or wildcard pattern.
    fn subscribe(&self, subject: &str) -> Result<Subscription, BusError>;

    /// Allocate a fresh, unique reply subject.
    fn new_inbox(&self) -> String {
        format!("{INBOX_PREFIX}.{}", Uuid::new_v4().simple())
    }

    /// Send a request and wait for the first reply.
    ///
    /// The reply inbox is subscribed before the request is published, so a
    /// fast responder cannot be missed.
    async fn request(
        &self,
        subject: &str,
        payload: Vec<u8>,
        timeout: Duration,
    ) -> Result<Message, BusError> {
        let inbox = self.new_inbox();
        let mut replies = self.subscribe(&inbox)?;
        self.publish_request(subject, &inbox, payload).await?;
        replies
            .next_timeout(timeout)
            .await
            .map_err(|e| match e {
                BusError::Timeout { waited, .. } => BusError::Timeout {
                    subject: subject.to_string(),
                    waited,
                },
                other => other,
            })
    }

    /// Answer a request on its reply subject.
    async fn respond(&self, request: &Message, payload: Vec<u8>) -> Result<usize, BusError> {
        let reply = request.reply.as_deref().ok_or(BusError::NoReplySubject)?;
        self.publish(reply, payload).await
    }
}

/// In-memory implementation of the message bus.
///
/// Uses `tokio::sync::broadcast` for multi-producer, multi-consumer semantics;
/// each subscription filters by subject. Suitable for single-process
/// operation and tests; a networked deployment would implement `MessageBus`
/// over its own transport.
pub struct InMemoryBus {
    /// Broadcast sender for messages.
    sender: broadcast::Sender<Message>,

    /// Close signal shared with every subscription.
    closed: watch::Sender<bool>,

    /// Active subscription count by subject pattern.
    interest: Arc<RwLock<HashMap<String, usize>>>,

    /// Total messages published.
    messages_published: AtomicU64,

    /// Channel capacity.
    capacity: usize,
}

impl InMemoryBus {
    /// Create a new in-memory bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a new in-memory bus with specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        let (closed, _) = watch::channel(false);
        Self {
            sender,
            closed,
            interest: Arc::new(RwLock::new(HashMap::new())),
            messages_published: AtomicU64::new(0),
            capacity,
        }
    }

    /// Close the bus. Later publishes fail and every subscription ends.
    pub fn close(&self) {
        self.closed.send_replace(true);
        debug!("Message bus closed");
    }

    /// Whether [`InMemoryBus::close`] was called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }

    /// Number of live subscriptions on exactly this subject pattern.
    #[must_use]
    pub fn interest(&self, pattern: &str) -> usize {
        self.interest
            .read()
            .map(|i| i.get(pattern).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Get the number of active subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Get the channel capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get the total number of messages published.
    #[must_use]
    pub fn messages_published(&self) -> u64 {
        self.messages_published.load(Ordering::Relaxed)
    }

    fn send(&self, message: Message) -> Result<usize, BusError> {
        if self.is_closed() {
            return Err(BusError::Closed);
        }
        validate_subject(&message.subject)?;
        if let Some(reply) = &message.reply {
            validate_subject(reply)?;
        }

        self.messages_published.fetch_add(1, Ordering::Relaxed);
        let subject = message.subject.clone();

        match self.sender.send(message) {
            Ok(receivers) => {
                debug!(subject = %subject, receivers, "Message published");
                Ok(receivers)
            }
            Err(_) => {
                // No receivers - message is dropped
                warn!(subject = %subject, "Message dropped (no subscribers)");
                Ok(0)
            }
        }
    }
}

impl Default for InMemoryBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageBus for InMemoryBus {
    async fn publish(&self, subject: &str, payload: Vec<u8>) -> Result<usize, BusError> {
        self.send(Message::new(subject, payload))
    }

    async fn publish_request(
        &self,
        subject: &str,
        reply: &str,
        payload: Vec<u8>,
    ) -> Result<usize, BusError> {
        self.send(Message::with_reply(subject, reply, payload))
    }

    fn subscribe(&self, subject: &str) -> Result<Subscription, BusError> {
        if self.is_closed() {
            return Err(BusError::Closed);
        }
        let filter = SubjectFilter::new(subject)?;
        let receiver = self.sender.subscribe();

        if let Ok(mut interest) = self.interest.write() {
            *interest.entry(subject.to_string()).or_insert(0) += 1;
        }
        debug!(subject = %subject, "New subscription created");

        Ok(Subscription::new(
            receiver,
            filter,
            self.closed.subscribe(),
            Arc::clone(&self.interest),
        ))
    }
}
