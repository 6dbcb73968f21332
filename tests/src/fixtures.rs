//! # Deployment Fixture
//!
//! One bus with a resolver, a registration endpoint and a discovery
//! responder, each started the way the runtime starts them.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use rg_01_claims::AccountClaimIssuer;
use rg_02_resolver::{
    BusResolverPublisher, ClaimStore, InMemoryClaimStore, ResolverResponder, StoredClaim,
};
use rg_03_registration::{
    DiscoveryResponder, Registered, RegistrationApi, RegistrationClient, RegistrationEndpoint,
    RegistrationError, RegistrationService, ServiceKeys,
};
use shared_bus::InMemoryBus;
use shared_crypto::{KeyPair, KeyRole};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Client wait for discovery.
pub const DISCOVERY_WAIT: Duration = Duration::from_millis(500);

/// Client wait for the registration reply.
pub const RESPONSE_WAIT: Duration = Duration::from_secs(1);

/// Registration service that remembers every decrypted payload.
pub struct RecordingService<S: RegistrationApi> {
    inner: S,
    payloads: Mutex<Vec<(String, Vec<u8>)>>,
}

impl<S: RegistrationApi> RecordingService<S> {
    /// `(client key, payload)` of every successful registration so far.
    pub fn payloads(&self) -> Vec<(String, Vec<u8>)> {
        self.payloads.lock().clone()
    }
}

#[async_trait]
impl<S: RegistrationApi> RegistrationApi for RecordingService<S> {
    async fn register(&self, body: &[u8]) -> Result<Registered, RegistrationError> {
        let registered = self.inner.register(body).await?;
        self.payloads
            .lock()
            .push((registered.client_public_key.clone(), registered.payload.clone()));
        Ok(registered)
    }

    fn service_public_key(&self) -> String {
        self.inner.service_public_key()
    }
}

type Service = RecordingService<RegistrationService<AccountClaimIssuer, BusResolverPublisher<InMemoryBus>>>;

/// A running deployment.
pub struct Deployment {
    pub bus: Arc<InMemoryBus>,
    pub keys: ServiceKeys,
    pub claims: Arc<InMemoryClaimStore>,
    pub service: Arc<Service>,
    shutdown: watch::Sender<bool>,
    resolver_shutdown: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
    resolver: Option<JoinHandle<()>>,
}

impl Deployment {
    /// Deployment with a resolver trusting the service's operator.
    pub fn start() -> Self {
        Self::build(true)
    }

    /// Deployment whose publications go unanswered.
    pub fn start_without_resolver() -> Self {
        Self::build(false)
    }

    fn build(with_resolver: bool) -> Self {
        let bus = Arc::new(InMemoryBus::new());
        let keys = ServiceKeys::with_generated_service(
            KeyPair::generate(KeyRole::Operator),
            KeyPair::generate(KeyRole::Account),
        )
        .unwrap();
        let claims = Arc::new(InMemoryClaimStore::new());
        let (shutdown, rx) = watch::channel(false);
        let (resolver_shutdown, resolver_rx) = watch::channel(false);
        let mut tasks = Vec::new();

        let resolver = with_resolver.then(|| {
            ResolverResponder::new(
                Arc::clone(&bus),
                Arc::clone(&claims),
                [keys.operator().public_key()],
            )
            .start(resolver_rx)
            .unwrap()
        });

        let issuer = AccountClaimIssuer::new(Arc::clone(keys.account())).unwrap();
        let publisher =
            BusResolverPublisher::new(Arc::clone(&bus)).with_timeout(Duration::from_millis(200));
        let service = Arc::new(RecordingService {
            inner: RegistrationService::new(&keys, issuer, publisher),
            payloads: Mutex::new(Vec::new()),
        });

        tasks.push(
            RegistrationEndpoint::new(Arc::clone(&service), Arc::clone(&bus))
                .start(rx.clone())
                .unwrap(),
        );
        tasks.push(
            DiscoveryResponder::new(Arc::clone(&bus), keys.service().public_key())
                .start(rx)
                .unwrap(),
        );

        Self {
            bus,
            keys,
            claims,
            service,
            shutdown,
            resolver_shutdown,
            tasks,
            resolver,
        }
    }

    /// A new client with a fresh user key.
    pub fn client(&self) -> RegistrationClient<InMemoryBus> {
        RegistrationClient::new(Arc::clone(&self.bus)).with_timeouts(DISCOVERY_WAIT, RESPONSE_WAIT)
    }

    /// A client registering `key`.
    pub fn client_with_key(&self, key: KeyPair) -> RegistrationClient<InMemoryBus> {
        RegistrationClient::with_key(Arc::clone(&self.bus), key)
            .unwrap()
            .with_timeouts(DISCOVERY_WAIT, RESPONSE_WAIT)
    }

    /// What the resolver holds for `client_public_key`.
    pub fn resolved(&self, client_public_key: &str) -> Option<StoredClaim> {
        self.claims.lookup(client_public_key)
    }

    /// Stop intake and drain it, then stop the resolver and close the bus.
    pub async fn stop(self) {
        self.shutdown.send_replace(true);
        for task in self.tasks {
            join_endpoint(task).await;
        }
        self.resolver_shutdown.send_replace(true);
        if let Some(task) = self.resolver {
            join_endpoint(task).await;
        }
        self.bus.close();
    }
}

async fn join_endpoint(task: JoinHandle<()>) {
    tokio::time::timeout(Duration::from_secs(2), task)
        .await
        .expect("endpoint should drain")
        .expect("endpoint task should not panic");
}
