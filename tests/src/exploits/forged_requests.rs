//! # Forged Registration Requests
//!
//! Requests an attacker can put on the bus without holding the right keys.
//! The service must drop each one without replying or publishing.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rg_02_resolver::ClaimStore;
    use shared_bus::{BusError, MessageBus};
    use shared_crypto::{open, seal, KeyPair, KeyRole};
    use shared_types::{RegistrationRequest, RegistrationResponse, WireBody, REGISTER_SUBJECT};

    use crate::fixtures::Deployment;

    const NO_REPLY_WAIT: Duration = Duration::from_millis(400);

    /// Send `body` and expect silence.
    async fn assert_dropped(deployment: &Deployment, body: Vec<u8>) {
        let result = deployment
            .bus
            .request(REGISTER_SUBJECT, body, NO_REPLY_WAIT)
            .await;
        assert!(
            matches!(result, Err(BusError::Timeout { .. })),
            "expected no reply, got {result:?}"
        );
    }

    fn sealed_request(client: &KeyPair, recipient: &KeyPair, payload: &[u8]) -> RegistrationRequest {
        RegistrationRequest {
            client_public_key: client.public_key(),
            encrypted_payload: seal(client, recipient, payload).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_tampered_payload_gets_no_reply() {
        let deployment = Deployment::start();
        let client = KeyPair::generate(KeyRole::User);
        let mut request = sealed_request(&client, deployment.keys.service(), b"data");
        let middle = request.encrypted_payload.len() / 2;
        request.encrypted_payload[middle] ^= 0x80;

        assert_dropped(&deployment, request.to_json().unwrap()).await;
        assert!(deployment.resolved(&client.public_key()).is_none());

        deployment.stop().await;
    }

    #[tokio::test]
    async fn test_garbage_client_key_gets_no_reply() {
        let deployment = Deployment::start();
        let request = RegistrationRequest {
            client_public_key: "UABC".into(),
            encrypted_payload: vec![0u8; 64],
        };

        assert_dropped(&deployment, request.to_json().unwrap()).await;
        assert!(deployment.claims.is_empty());

        deployment.stop().await;
    }

    #[tokio::test]
    async fn test_account_key_cannot_register_as_user() {
        let deployment = Deployment::start();
        let account = KeyPair::generate(KeyRole::Account);
        let request = sealed_request(&account, deployment.keys.service(), b"data");

        assert_dropped(&deployment, request.to_json().unwrap()).await;
        assert!(deployment.claims.is_empty());

        deployment.stop().await;
    }

    #[tokio::test]
    async fn test_impersonating_another_key_fails_decryption() {
        let deployment = Deployment::start();
        let attacker = KeyPair::generate(KeyRole::User);
        let victim = KeyPair::generate(KeyRole::User);

        // Sealed by the attacker but labelled with the victim's key
        let mut request = sealed_request(&attacker, deployment.keys.service(), b"data");
        request.client_public_key = victim.public_key();

        assert_dropped(&deployment, request.to_json().unwrap()).await;
        assert!(deployment.resolved(&victim.public_key()).is_none());

        deployment.stop().await;
    }

    #[tokio::test]
    async fn test_payload_for_other_service_gets_no_reply() {
        let deployment = Deployment::start();
        let client = KeyPair::generate(KeyRole::User);
        let elsewhere = KeyPair::generate(KeyRole::Server);
        let request = sealed_request(&client, &elsewhere, b"data");

        assert_dropped(&deployment, request.to_json().unwrap()).await;

        deployment.stop().await;
    }

    #[tokio::test]
    async fn test_replayed_request_reply_is_unreadable_to_replayer() {
        let deployment = Deployment::start();
        let victim = KeyPair::generate(KeyRole::User);
        let attacker = KeyPair::generate(KeyRole::User);
        let captured = sealed_request(&victim, deployment.keys.service(), b"data")
            .to_json()
            .unwrap();

        // The replay is a valid request, so it is answered, but only for the victim
        let reply = deployment
            .bus
            .request(REGISTER_SUBJECT, captured, Duration::from_secs(1))
            .await
            .unwrap();
        let response = RegistrationResponse::from_json(&reply.payload).unwrap();

        assert!(open(&attacker, deployment.keys.service(), &response.encrypted_claim).is_err());
        assert!(open(&victim, deployment.keys.service(), &response.encrypted_claim).is_ok());

        deployment.stop().await;
    }

    #[tokio::test]
    async fn test_service_keeps_serving_after_forgeries() {
        let deployment = Deployment::start();

        for body in [b"".to_vec(), b"{}".to_vec(), b"\xff\xfe".to_vec()] {
            deployment
                .bus
                .publish_request(REGISTER_SUBJECT, "_INBOX.attacker", body)
                .await
                .unwrap();
        }

        assert!(deployment.client().register(b"data").await.is_ok());

        deployment.stop().await;
    }
}
