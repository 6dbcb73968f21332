//! # Bus Publisher
//!
//! `ResolverPublisher` that sends a signed `ClaimPublication` as a bus
//! request and waits for the resolver's `PublicationAck`.

use crate::domain::errors::PublishError;
use crate::domain::publication::sign_publication;
use crate::ports::inbound::ResolverPublisher;
use crate::DEFAULT_PUBLISH_TIMEOUT;
use async_trait::async_trait;
use shared_bus::{BusError, MessageBus};
use shared_crypto::KeyPair;
use shared_types::{PublicationAck, WireBody, RESOLVER_UPDATE_SUBJECT};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Publishes claims to a resolver listening on the bus.
pub struct BusResolverPublisher<B: MessageBus> {
    bus: Arc<B>,
    subject: String,
    timeout: Duration,
}

impl<B: MessageBus> BusResolverPublisher<B> {
    /// Publisher on the default resolver subject and timeout.
    #[must_use]
    pub fn new(bus: Arc<B>) -> Self {
        Self {
            bus,
            subject: RESOLVER_UPDATE_SUBJECT.to_string(),
            timeout: DEFAULT_PUBLISH_TIMEOUT,
        }
    }

    /// Use a different resolver subject.
    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    /// Use a different acknowledgement timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl<B: MessageBus> ResolverPublisher for BusResolverPublisher<B> {
    async fn publish(
        &self,
        token: &str,
        claim_id: &str,
        issuer_key: &KeyPair,
    ) -> Result<(), PublishError> {
        let publication =
            sign_publication(token, claim_id, issuer_key).map_err(PublishError::OperatorKey)?;
        let body = publication
            .to_json()
            .map_err(|e| PublishError::Encode(e.to_string()))?;

        let reply = self
            .bus
            .request(&self.subject, body, self.timeout)
            .await
            .map_err(|e| match e {
                BusError::Timeout { .. } => PublishError::Timeout,
                other => PublishError::Bus(other),
            })?;

        let ack = PublicationAck::from_json(&reply.payload)
            .map_err(|e| PublishError::MalformedAck(e.to_string()))?;
        if !ack.is_accepted() {
            warn!(claim_id = %claim_id, code = ack.code, message = %ack.message, "Resolver rejected claim");
            return Err(PublishError::Rejected {
                code: ack.code,
                message: ack.message,
            });
        }

        debug!(claim_id = %claim_id, "Claim accepted by resolver");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_bus::InMemoryBus;
    use shared_crypto::KeyRole;
    use shared_types::ClaimPublication;

    fn operator() -> KeyPair {
        KeyPair::generate(KeyRole::Operator)
    }

    /// Answers the next publication with `ack` and hands back what it received.
    fn spawn_acker(
        bus: &Arc<InMemoryBus>,
        ack: Vec<u8>,
    ) -> tokio::task::JoinHandle<Option<ClaimPublication>> {
        let mut sub = bus.subscribe(RESOLVER_UPDATE_SUBJECT).unwrap();
        let bus = Arc::clone(bus);
        tokio::spawn(async move {
            let request = sub.recv().await?;
            bus.respond(&request, ack).await.ok()?;
            ClaimPublication::from_json(&request.payload).ok()
        })
    }

    #[tokio::test]
    async fn test_publish_accepted() {
        let bus = Arc::new(InMemoryBus::new());
        let acker = spawn_acker(&bus, PublicationAck::accepted("ok").to_json().unwrap());
        let publisher = BusResolverPublisher::new(Arc::clone(&bus));
        let operator = operator();

        publisher.publish("a.b.c", "UCLIENT", &operator).await.unwrap();

        let seen = acker.await.unwrap().unwrap();
        assert_eq!(seen.claim_id, "UCLIENT");
        assert_eq!(seen.token, "a.b.c");
        assert_eq!(seen.operator, operator.public_key());
    }

    #[tokio::test]
    async fn test_publish_rejected() {
        let bus = Arc::new(InMemoryBus::new());
        let _acker = spawn_acker(
            &bus,
            PublicationAck::rejected(401, "untrusted").to_json().unwrap(),
        );
        let publisher = BusResolverPublisher::new(Arc::clone(&bus));

        let result = publisher.publish("a.b.c", "UCLIENT", &operator()).await;
        assert_eq!(
            result,
            Err(PublishError::Rejected {
                code: 401,
                message: "untrusted".into()
            })
        );
    }

    #[tokio::test]
    async fn test_publish_malformed_ack() {
        let bus = Arc::new(InMemoryBus::new());
        let _acker = spawn_acker(&bus, b"garbage".to_vec());
        let publisher = BusResolverPublisher::new(Arc::clone(&bus));

        let result = publisher.publish("a.b.c", "UCLIENT", &operator()).await;
        assert!(matches!(result, Err(PublishError::MalformedAck(_))));
    }

    #[tokio::test]
    async fn test_publish_without_resolver_times_out() {
        let bus = Arc::new(InMemoryBus::new());
        let publisher = BusResolverPublisher::new(Arc::clone(&bus))
            .with_timeout(Duration::from_millis(30));

        let result = publisher.publish("a.b.c", "UCLIENT", &operator()).await;
        assert_eq!(result, Err(PublishError::Timeout));
    }

    #[tokio::test]
    async fn test_publish_with_account_key_fails_before_sending() {
        let bus = Arc::new(InMemoryBus::new());
        let publisher = BusResolverPublisher::new(Arc::clone(&bus));
        let account = KeyPair::generate(KeyRole::Account);

        let result = publisher.publish("a.b.c", "UCLIENT", &account).await;
        assert!(matches!(result, Err(PublishError::OperatorKey(_))));
        assert_eq!(bus.messages_published(), 0);
    }

    #[tokio::test]
    async fn test_publish_on_closed_bus() {
        let bus = Arc::new(InMemoryBus::new());
        bus.close();
        let publisher = BusResolverPublisher::new(Arc::clone(&bus));

        let result = publisher.publish("a.b.c", "UCLIENT", &operator()).await;
        assert_eq!(result, Err(PublishError::Bus(BusError::Closed)));
    }
}
