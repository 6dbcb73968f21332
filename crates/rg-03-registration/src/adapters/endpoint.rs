//! # Registration Endpoint
//!
//! Connects a [`RegistrationApi`] to the bus.
//!
//! ## Request Flow
//!
//! ```text
//! auth.register ──RegistrationRequest──→ [endpoint] ──spawn──→ [RegistrationApi]
//!                                                                    │
//!                                   ┌────────────────────────────────┴──────┐
//!                                   ↓                                       ↓
//!                                [Ok]                                    [Err]
//!                                   │                                       │
//!             RegistrationResponse ─→ reply inbox                warn!, no reply
//! ```
//!
//! Requests without a reply subject are dropped before any processing. On
//! shutdown the endpoint stops taking new messages and waits for the
//! handlers already running.

use crate::ports::inbound::RegistrationApi;
use shared_bus::{BusError, Message, MessageBus};
use shared_types::REGISTER_SUBJECT;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, error, info, warn};

/// Serves registration requests from the bus.
pub struct RegistrationEndpoint<S: RegistrationApi, B: MessageBus> {
    service: Arc<S>,
    bus: Arc<B>,
    subject: String,
}

impl<S, B> RegistrationEndpoint<S, B>
where
    S: RegistrationApi + 'static,
    B: MessageBus + 'static,
{
    /// Create an endpoint on the default registration subject.
    pub fn new(service: Arc<S>, bus: Arc<B>) -> Self {
        Self {
            service,
            bus,
            subject: REGISTER_SUBJECT.to_string(),
        }
    }

    /// Listen on a different subject.
    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    /// Subscribe and serve until `shutdown` flips to `true` or the bus closes.
    ///
    /// The subscription exists when this returns. The returned task finishes
    /// after every in-flight handler has finished.
    ///
    /// # Errors
    ///
    /// `BusError` if the subscription cannot be created.
    pub fn start(self, mut shutdown: watch::Receiver<bool>) -> Result<JoinHandle<()>, BusError> {
        let mut subscription = self.bus.subscribe(&self.subject)?;
        info!(subject = %self.subject, "Registration endpoint listening");

        Ok(tokio::spawn(async move {
            let mut handlers = JoinSet::new();

            loop {
                tokio::select! {
                    received = subscription.recv() => match received {
                        Some(message) => self.dispatch(message, &mut handlers),
                        None => break,
                    },
                    Some(finished) = handlers.join_next(), if !handlers.is_empty() => {
                        log_panic(finished);
                    }
                    _ = shutdown.changed() => {
                        info!("[registration] Shutdown signal received");
                        break;
                    }
                }
            }

            let in_flight = handlers.len();
            if in_flight > 0 {
                debug!(in_flight, "Draining registration handlers");
            }
            while let Some(finished) = handlers.join_next().await {
                log_panic(finished);
            }
            info!("[registration] Endpoint stopped");
        }))
    }

    fn dispatch(&self, message: Message, handlers: &mut JoinSet<()>) {
        if message.reply.is_none() {
            warn!(subject = %message.subject, "Registration request without reply subject dropped");
            return;
        }

        let service = Arc::clone(&self.service);
        let bus = Arc::clone(&self.bus);
        handlers.spawn(async move {
            match service.register(&message.payload).await {
                Ok(registered) => {
                    if let Err(e) = bus.respond(&message, registered.reply).await {
                        warn!(
                            client = %registered.client_public_key,
                            error = %e,
                            "Failed to send registration reply"
                        );
                    }
                }
                Err(e) => {
                    warn!(kind = e.kind(), error = %e, "Registration request dropped");
                }
            }
        });
    }
}

fn log_panic(finished: Result<(), tokio::task::JoinError>) {
    if let Err(e) = finished {
        error!(error = %e, "Registration handler panicked");
    }
}
