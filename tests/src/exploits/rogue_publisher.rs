//! # Rogue Resolver Publications
//!
//! Publications that bypass the registration service and go straight to the
//! resolver. Only the trusted operator may change what the resolver holds.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;
    use rg_01_claims::{AccountClaimIssuer, ClaimIssuer, UserClaim};
    use rg_02_resolver::{BusResolverPublisher, PublishError, ResolverPublisher};
    use shared_crypto::{KeyPair, KeyRole};

    use crate::fixtures::Deployment;

    fn rogue_issuer() -> AccountClaimIssuer {
        AccountClaimIssuer::new(Arc::new(KeyPair::generate(KeyRole::Account))).unwrap()
    }

    #[tokio::test]
    async fn test_untrusted_operator_cannot_overwrite_claim() {
        let deployment = Deployment::start();
        let client = deployment.client();
        client.register(b"data").await.unwrap();
        let legitimate = deployment.resolved(&client.public_key()).unwrap();

        let forged = rogue_issuer().issue(&client.public_key()).unwrap();
        let rogue_operator = KeyPair::generate(KeyRole::Operator);
        let result = BusResolverPublisher::new(Arc::clone(&deployment.bus))
            .publish(&forged.token, &client.public_key(), &rogue_operator)
            .await;

        assert!(matches!(result, Err(PublishError::Rejected { code: 401, .. })));
        assert_eq!(deployment.resolved(&client.public_key()).unwrap(), legitimate);

        deployment.stop().await;
    }

    #[tokio::test]
    async fn test_claim_cannot_be_filed_under_another_key() {
        let deployment = Deployment::start();
        let attacker = KeyPair::generate(KeyRole::User).public_key();
        let victim = KeyPair::generate(KeyRole::User).public_key();

        // Even with the trusted operator, the token must be about the claim id
        let issued = rogue_issuer().issue(&attacker).unwrap();
        let result = BusResolverPublisher::new(Arc::clone(&deployment.bus))
            .publish(&issued.token, &victim, deployment.keys.operator())
            .await;

        assert!(matches!(result, Err(PublishError::Rejected { code: 400, .. })));
        assert!(deployment.resolved(&victim).is_none());

        deployment.stop().await;
    }

    #[tokio::test]
    async fn test_edited_token_is_rejected() {
        let deployment = Deployment::start();
        let client = deployment.client();
        let token = client.register(b"data").await.unwrap();
        let token = String::from_utf8(token).unwrap();

        // Swap in a claim body with extra tags but keep the original signature
        let mut segments: Vec<String> = token.split('.').map(str::to_string).collect();
        let original = rg_01_claims::decode_token(&token).unwrap();
        let escalated: UserClaim = original.with_tag("admin");
        segments[1] = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&escalated).unwrap());
        let forged = segments.join(".");

        let result = BusResolverPublisher::new(Arc::clone(&deployment.bus))
            .publish(&forged, &client.public_key(), deployment.keys.operator())
            .await;

        assert!(matches!(result, Err(PublishError::Rejected { code: 400, .. })));
        assert!(!deployment
            .resolved(&client.public_key())
            .unwrap()
            .claim
            .has_tag("admin"));

        deployment.stop().await;
    }
}
