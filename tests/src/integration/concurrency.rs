//! # Concurrent Registrations
//!
//! Many clients at once: every reply is preceded by the resolver accepting
//! that client's claim, and no claim leaks to another client.

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use rg_01_claims::decode_token;
    use rg_02_resolver::{ClaimStore, InMemoryClaimStore};
    use tokio::task::JoinSet;

    use crate::fixtures::Deployment;

    const CLIENTS: usize = 16;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_clients_each_resolved_before_reply() {
        let deployment = Deployment::start();
        let mut registrations = JoinSet::new();

        for i in 0..CLIENTS {
            let client = deployment.client();
            let claims: Arc<InMemoryClaimStore> = Arc::clone(&deployment.claims);
            registrations.spawn(async move {
                let payload = format!("client-payload-{i}");
                let token = client.register(payload.as_bytes()).await.unwrap();

                // Checked the moment the reply lands
                let resolved = claims.lookup(&client.public_key());
                (client.public_key(), token, resolved)
            });
        }

        let mut names = HashSet::new();
        while let Some(joined) = registrations.join_next().await {
            let (public_key, token, resolved) = joined.unwrap();
            let claim = decode_token(std::str::from_utf8(&token).unwrap()).unwrap();

            assert_eq!(claim.subject_public_key, public_key);
            let resolved = resolved.expect("claim stored before reply");
            assert_eq!(resolved.claim, claim);
            assert!(names.insert(claim.name));
        }

        assert_eq!(deployment.claims.len(), CLIENTS);
        assert_eq!(deployment.service.payloads().len(), CLIENTS);

        deployment.stop().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_payloads_arrive_intact_under_load() {
        let deployment = Deployment::start();
        let mut registrations = JoinSet::new();

        for i in 0..CLIENTS {
            let client = deployment.client();
            registrations.spawn(async move {
                let payload = vec![u8::try_from(i).unwrap(); 64 + i];
                client.register(&payload).await.unwrap();
                (client.public_key(), payload)
            });
        }

        let mut sent = Vec::new();
        while let Some(joined) = registrations.join_next().await {
            sent.push(joined.unwrap());
        }

        let mut received = deployment.service.payloads();
        sent.sort();
        received.sort();
        assert_eq!(sent, received);

        deployment.stop().await;
    }
}
