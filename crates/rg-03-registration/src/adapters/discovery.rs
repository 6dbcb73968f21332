//! # Public-Key Discovery
//!
//! Answers every query on the discovery subject with the service public key
//! as a plain UTF-8 string.

use shared_bus::{BusError, MessageBus};
use shared_types::DISCOVERY_SUBJECT;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Publishes the service key on request.
pub struct DiscoveryResponder<B: MessageBus> {
    bus: Arc<B>,
    public_key: String,
    subject: String,
}

impl<B: MessageBus + 'static> DiscoveryResponder<B> {
    /// Responder for `public_key` on the default discovery subject.
    pub fn new(bus: Arc<B>, public_key: impl Into<String>) -> Self {
        Self {
            bus,
            public_key: public_key.into(),
            subject: DISCOVERY_SUBJECT.to_string(),
        }
    }

    /// Listen on a different subject.
    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    /// Subscribe and answer queries until `shutdown` flips or the bus closes.
    ///
    /// # Errors
    ///
    /// `BusError` if the subscription cannot be created.
    pub fn start(self, mut shutdown: watch::Receiver<bool>) -> Result<JoinHandle<()>, BusError> {
        let mut subscription = self.bus.subscribe(&self.subject)?;
        info!(subject = %self.subject, key = %self.public_key, "Discovery responder listening");

        Ok(tokio::spawn(async move {
            loop {
                tokio::select! {
                    received = subscription.recv() => {
                        let Some(query) = received else { break };
                        if query.reply.is_none() {
                            debug!("Discovery query without reply subject ignored");
                            continue;
                        }
                        let key = self.public_key.as_bytes().to_vec();
                        if let Err(e) = self.bus.respond(&query, key).await {
                            warn!(error = %e, "Failed to answer discovery query");
                        }
                    }
                    _ = shutdown.changed() => break,
                }
            }
            debug!("[discovery] Responder stopped");
        }))
    }
}
