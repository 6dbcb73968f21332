//! # Subscriptions
//!
//! The receiving side of the bus.

use crate::message::{Message, SubjectFilter};
use crate::BusError;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tracing::{debug, warn};

/// A subscription handle for receiving messages.
///
/// When dropped, the subscription is automatically cleaned up.
pub struct Subscription {
    /// The broadcast receiver.
    receiver: broadcast::Receiver<Message>,

    /// Filter for this subscription.
    filter: SubjectFilter,

    /// Bus close signal.
    closed: watch::Receiver<bool>,

    /// Reference to interest tracking (for cleanup).
    interest: Arc<RwLock<HashMap<String, usize>>>,
}

impl Subscription {
    pub(crate) fn new(
        receiver: broadcast::Receiver<Message>,
        filter: SubjectFilter,
        closed: watch::Receiver<bool>,
        interest: Arc<RwLock<HashMap<String, usize>>>,
    ) -> Self {
        Self {
            receiver,
            filter,
            closed,
            interest,
        }
    }

    /// Receive the next message that matches the filter.
    ///
    /// # Returns
    ///
    /// - `Some(message)` - The next matching message
    /// - `None` - The bus was closed or dropped
    pub async fn recv(&mut self) -> Option<Message> {
        loop {
            if *self.closed.borrow() {
                return None;
            }

            let message = tokio::select! {
                received = self.receiver.recv() => match received {
                    Ok(m) => m,
                    Err(broadcast::error::RecvError::Closed) => return None,
                    Err(broadcast::error::RecvError::Lagged(count)) => {
                        warn!(dropped = count, subject = %self.filter.pattern(), "Subscriber lagged, messages dropped");
                        continue;
                    }
                },
                changed = self.closed.changed() => {
                    if changed.is_err() {
                        return None;
                    }
                    continue;
                }
            };

            if self.filter.matches(&message.subject) {
                return Some(message);
            }
        }
    }

    /// Receive the next matching message, waiting at most `wait`.
    ///
    /// # Errors
    ///
    /// - `BusError::Timeout` if nothing arrives in time
    /// - `BusError::Closed` if the bus closes first
    pub async fn next_timeout(&mut self, wait: Duration) -> Result<Message, BusError> {
        match tokio::time::timeout(wait, self.recv()).await {
            Ok(Some(message)) => Ok(message),
            Ok(None) => Err(BusError::Closed),
            Err(_) => Err(BusError::Timeout {
                subject: self.filter.pattern().to_string(),
                waited: wait,
            }),
        }
    }

    /// Try to receive the next matching message without blocking.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(message))` - A message was available and matched
    /// - `Ok(None)` - No message available
    /// - `Err(BusError::Closed)` - The bus was closed
    pub fn try_recv(&mut self) -> Result<Option<Message>, BusError> {
        loop {
            if *self.closed.borrow() {
                return Err(BusError::Closed);
            }
            let message = match self.receiver.try_recv() {
                Ok(m) => m,
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(broadcast::error::TryRecvError::Closed) => return Err(BusError::Closed),
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            };

            if self.filter.matches(&message.subject) {
                return Ok(Some(message));
            }
        }
    }

    /// Get the filter for this subscription.
    #[must_use]
    pub fn filter(&self) -> &SubjectFilter {
        &self.filter
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Ok(mut interest) = self.interest.write() else {
            return;
        };
        let key = self.filter.pattern();
        if let Some(count) = interest.get_mut(key) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                interest.remove(key);
            }
        }
        debug!(subject = %key, "Subscription dropped");
    }
}
