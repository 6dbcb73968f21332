//! # Resolver Responder
//!
//! The resolver endpoint: answers every `ClaimPublication` on the resolver
//! subject with a `PublicationAck`, storing the claims it accepts.

use crate::domain::errors::Rejection;
use crate::domain::publication::verify_publication;
use crate::ports::outbound::{ClaimStore, StoredClaim};
use shared_bus::{BusError, Message, MessageBus};
use shared_types::{ClaimPublication, PublicationAck, WireBody, RESOLVER_UPDATE_SUBJECT};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Resolver endpoint trusting a fixed set of operator keys.
pub struct ResolverResponder<B: MessageBus, S: ClaimStore> {
    bus: Arc<B>,
    store: Arc<S>,
    trusted_operators: HashSet<String>,
    subject: String,
}

impl<B, S> ResolverResponder<B, S>
where
    B: MessageBus + 'static,
    S: ClaimStore + 'static,
{
    /// Create a responder on the default resolver subject.
    pub fn new<I>(bus: Arc<B>, store: Arc<S>, trusted_operators: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            bus,
            store,
            trusted_operators: trusted_operators.into_iter().collect(),
            subject: RESOLVER_UPDATE_SUBJECT.to_string(),
        }
    }

    /// Listen on a different subject.
    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    /// The backing store, shared with whoever else holds it.
    #[must_use]
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// The claim currently stored under `claim_id`.
    #[must_use]
    pub fn lookup(&self, claim_id: &str) -> Option<StoredClaim> {
        self.store.lookup(claim_id)
    }

    /// Number of stored claim IDs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Whether nothing has been accepted yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Verify and store one publication body.
    ///
    /// # Errors
    ///
    /// The [`Rejection`] when the publication is refused; nothing is stored.
    pub fn accept(&self, body: &[u8]) -> Result<StoredClaim, Rejection> {
        let publication = ClaimPublication::from_json(body).map_err(|_| Rejection::Malformed)?;
        let claim = verify_publication(&publication, &self.trusted_operators)?;

        let record = StoredClaim {
            claim,
            token: publication.token,
            operator: publication.operator,
        };
        self.store.store(&publication.claim_id, record.clone());
        Ok(record)
    }

    /// Subscribe and serve until `shutdown` flips to `true` or the bus closes.
    ///
    /// The subscription is in place when this returns, so publications sent
    /// afterwards are not missed.
    ///
    /// # Errors
    ///
    /// `BusError` if the subscription cannot be created.
    pub fn start(self, mut shutdown: watch::Receiver<bool>) -> Result<JoinHandle<()>, BusError> {
        let mut subscription = self.bus.subscribe(&self.subject)?;
        info!(subject = %self.subject, operators = self.trusted_operators.len(), "Resolver listening");

        Ok(tokio::spawn(async move {
            loop {
                tokio::select! {
                    received = subscription.recv() => match received {
                        Some(message) => self.handle(message).await,
                        None => break,
                    },
                    _ = shutdown.changed() => {
                        info!("[resolver] Shutdown signal received");
                        break;
                    }
                }
            }
        }))
    }

    async fn handle(&self, message: Message) {
        let ack = match self.accept(&message.payload) {
            Ok(record) => {
                debug!(
                    subject = %record.claim.subject_public_key,
                    name = %record.claim.name,
                    "Claim stored"
                );
                PublicationAck::accepted(format!("claim {} updated", record.claim.jti))
            }
            Err(rejection) => {
                warn!(reason = %rejection, "Claim publication rejected");
                rejection.to_ack()
            }
        };

        if message.reply.is_none() {
            return;
        }
        let body = match ack.to_json() {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "Failed to encode publication ack");
                return;
            }
        };
        if let Err(e) = self.bus.respond(&message, body).await {
            warn!(error = %e, "Failed to send publication ack");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::bus::BusResolverPublisher;
    use crate::adapters::memory::InMemoryClaimStore;
    use crate::domain::errors::PublishError;
    use crate::ports::inbound::ResolverPublisher;
    use rg_01_claims::{AccountClaimIssuer, ClaimIssuer};
    use shared_bus::InMemoryBus;
    use shared_crypto::{KeyPair, KeyRole};
    use std::time::Duration;

    struct Harness {
        bus: Arc<InMemoryBus>,
        store: Arc<InMemoryClaimStore>,
        operator: KeyPair,
        issuer: AccountClaimIssuer,
        shutdown: watch::Sender<bool>,
        task: JoinHandle<()>,
    }

    fn harness() -> Harness {
        let bus = Arc::new(InMemoryBus::new());
        let store = Arc::new(InMemoryClaimStore::new());
        let operator = KeyPair::generate(KeyRole::Operator);
        let issuer =
            AccountClaimIssuer::new(Arc::new(KeyPair::generate(KeyRole::Account))).unwrap();
        let (shutdown, shutdown_rx) = watch::channel(false);

        let task = ResolverResponder::new(
            Arc::clone(&bus),
            Arc::clone(&store),
            [operator.public_key()],
        )
        .start(shutdown_rx)
        .unwrap();

        Harness {
            bus,
            store,
            operator,
            issuer,
            shutdown,
            task,
        }
    }

    #[tokio::test]
    async fn test_accepts_and_stores_trusted_publication() {
        let h = harness();
        let user = KeyPair::generate(KeyRole::User).public_key();
        let issued = h.issuer.issue(&user).unwrap();

        BusResolverPublisher::new(Arc::clone(&h.bus))
            .publish(&issued.token, &user, &h.operator)
            .await
            .unwrap();

        let stored = h.store.lookup(&user).unwrap();
        assert_eq!(stored.claim, issued.claim);
        assert_eq!(stored.operator, h.operator.public_key());
    }

    #[tokio::test]
    async fn test_rejects_untrusted_operator() {
        let h = harness();
        let rogue = KeyPair::generate(KeyRole::Operator);
        let user = KeyPair::generate(KeyRole::User).public_key();
        let issued = h.issuer.issue(&user).unwrap();

        let result = BusResolverPublisher::new(Arc::clone(&h.bus))
            .publish(&issued.token, &user, &rogue)
            .await;

        assert!(matches!(result, Err(PublishError::Rejected { code: 401, .. })));
        assert!(h.store.is_empty());
    }

    #[tokio::test]
    async fn test_rejects_claim_for_other_subject() {
        let h = harness();
        let user = KeyPair::generate(KeyRole::User).public_key();
        let other = KeyPair::generate(KeyRole::User).public_key();
        let issued = h.issuer.issue(&user).unwrap();

        let result = BusResolverPublisher::new(Arc::clone(&h.bus))
            .publish(&issued.token, &other, &h.operator)
            .await;

        assert!(matches!(result, Err(PublishError::Rejected { code: 400, .. })));
        assert!(h.store.lookup(&other).is_none());
    }

    #[tokio::test]
    async fn test_republish_replaces_previous_claim() {
        let h = harness();
        let user = KeyPair::generate(KeyRole::User).public_key();
        let publisher = BusResolverPublisher::new(Arc::clone(&h.bus));

        let first = h.issuer.issue(&user).unwrap();
        publisher.publish(&first.token, &user, &h.operator).await.unwrap();
        let second = h.issuer.issue(&user).unwrap();
        publisher.publish(&second.token, &user, &h.operator).await.unwrap();

        assert_eq!(h.store.len(), 1);
        assert_eq!(h.store.lookup(&user).unwrap().claim.name, second.claim.name);
    }

    #[tokio::test]
    async fn test_malformed_body_gets_bad_request() {
        let h = harness();
        let reply = h
            .bus
            .request(RESOLVER_UPDATE_SUBJECT, b"{}".to_vec(), Duration::from_millis(500))
            .await
            .unwrap();

        let ack = PublicationAck::from_json(&reply.payload).unwrap();
        assert_eq!(ack.code, PublicationAck::BAD_REQUEST);
    }

    #[test]
    fn test_accept_without_bus_round_trip() {
        let operator = KeyPair::generate(KeyRole::Operator);
        let issuer =
            AccountClaimIssuer::new(Arc::new(KeyPair::generate(KeyRole::Account))).unwrap();
        let responder = ResolverResponder::new(
            Arc::new(InMemoryBus::new()),
            Arc::new(InMemoryClaimStore::new()),
            [operator.public_key()],
        );
        let user = KeyPair::generate(KeyRole::User).public_key();
        let issued = issuer.issue(&user).unwrap();
        let body = crate::sign_publication(&issued.token, &user, &operator)
            .unwrap()
            .to_json()
            .unwrap();

        assert!(responder.is_empty());
        responder.accept(&body).unwrap();
        assert_eq!(responder.len(), 1);
        assert_eq!(responder.lookup(&user).unwrap().token, issued.token);
        assert_eq!(responder.accept(b"nope"), Err(Rejection::Malformed));
    }

    #[tokio::test]
    async fn test_stops_on_shutdown() {
        let h = harness();
        h.shutdown.send(true).unwrap();

        tokio::time::timeout(Duration::from_millis(500), h.task)
            .await
            .expect("responder should stop")
            .unwrap();
    }
}
