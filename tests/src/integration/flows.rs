//! # Registration Flows
//!
//! Discovery, sealed request, claim issuance, resolver publication and the
//! sealed reply, against a full deployment.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use rg_01_claims::decode_token;
    use rg_02_resolver::ClaimStore;
    use rg_03_registration::{ClientError, RegistrationClient};
    use shared_bus::{BusError, InMemoryBus};
    use shared_crypto::{KeyPair, KeyRole};

    use crate::fixtures::Deployment;

    const PAYLOAD: &[u8] = b"my_secret_registration_data";

    #[tokio::test]
    async fn test_end_to_end_registration() {
        let deployment = Deployment::start();
        let client = deployment.client();

        let started = Instant::now();
        let token = client.register(PAYLOAD).await.unwrap();
        assert!(started.elapsed() < Duration::from_secs(2));
        assert!(!token.is_empty());

        // The client holds a claim signed by the account for its own key
        let claim = decode_token(std::str::from_utf8(&token).unwrap()).unwrap();
        assert_eq!(claim.subject_public_key, client.public_key());
        assert_eq!(claim.issuer_public_key, deployment.keys.account().public_key());
        assert!(claim.has_tag("registered"));
        assert_eq!(claim.tags.len(), 1);
        assert!(claim.limits.is_unlimited());
        assert!(claim.name.starts_with("client-"));

        // The service saw the plaintext
        assert_eq!(
            deployment.service.payloads(),
            vec![(client.public_key(), PAYLOAD.to_vec())]
        );

        // The resolver already holds the same claim
        let resolved = deployment.resolved(&client.public_key()).unwrap();
        assert_eq!(resolved.claim, claim);
        assert_eq!(resolved.operator, deployment.keys.operator().public_key());

        deployment.stop().await;
    }

    #[tokio::test]
    async fn test_client_key_prefix_is_user() {
        let deployment = Deployment::start();
        let client = deployment.client();

        assert!(client.public_key().starts_with('U'));
        assert!(client.register(PAYLOAD).await.is_ok());

        deployment.stop().await;
    }

    #[tokio::test]
    async fn test_discovery_timeout_without_service() {
        let bus = Arc::new(InMemoryBus::new());
        let bound = Duration::from_millis(200);
        let client = RegistrationClient::new(Arc::clone(&bus)).with_timeouts(bound, bound);

        let started = Instant::now();
        let result = client.register(PAYLOAD).await;

        assert_eq!(result, Err(ClientError::DiscoveryTimeout { waited: bound }));
        assert!(started.elapsed() < Duration::from_secs(1));

        // Nothing left behind: the discovery inbox was released
        assert_eq!(bus.subscriber_count(), 0);
        assert_eq!(bus.messages_published(), 1);
    }

    #[tokio::test]
    async fn test_reregistration_gets_fresh_claim() {
        let deployment = Deployment::start();
        let key = KeyPair::generate(KeyRole::User);
        let client = deployment.client_with_key(key.clone());

        let first = client.register(b"first").await.unwrap();
        let second = client.register(b"second").await.unwrap();

        let first = decode_token(std::str::from_utf8(&first).unwrap()).unwrap();
        let second = decode_token(std::str::from_utf8(&second).unwrap()).unwrap();
        assert_eq!(first.subject_public_key, second.subject_public_key);
        assert_ne!(first.name, second.name);

        // Last publish wins at the resolver
        let resolved = deployment.resolved(&key.public_key()).unwrap();
        assert_eq!(resolved.claim.name, second.name);
        assert_eq!(deployment.claims.len(), 1);

        deployment.stop().await;
    }

    #[tokio::test]
    async fn test_publication_failure_means_no_reply() {
        let deployment = Deployment::start_without_resolver();
        let client = deployment.client();

        let result = client.register(PAYLOAD).await;
        assert!(matches!(result, Err(ClientError::ResponseTimeout { .. })));
        assert!(deployment.service.payloads().is_empty());

        deployment.stop().await;
    }

    #[tokio::test]
    async fn test_closed_bus_reports_send_error() {
        let deployment = Deployment::start();
        let client = deployment.client();
        let bus = Arc::clone(&deployment.bus);

        deployment.stop().await;

        assert_eq!(
            client.register(PAYLOAD).await,
            Err(ClientError::SendError(BusError::Closed))
        );
        assert!(bus.is_closed());
    }
}
