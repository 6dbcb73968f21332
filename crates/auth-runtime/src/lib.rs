//! # Auth Runtime Library
//!
//! Runs the registration service, its discovery responder and an in-process
//! resolver on one message bus. The `main.rs` binary is a thin wrapper; the
//! runtime lives here so the integration tests can drive it.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration from the environment
//! 2. Decode operator and account seeds (fatal if missing or wrong role)
//! 3. Start the resolver, then the registration endpoint, then discovery
//! 4. Optionally register a demo client
//!
//! ## Shutdown Sequence
//!
//! 1. Signal discovery and the registration endpoint
//! 2. Wait for in-flight registrations (bounded by the drain timeout)
//! 3. Signal the resolver, which kept acking publications during the drain
//! 4. Close the bus

#![warn(missing_docs)]

pub mod container;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use parking_lot::Mutex;
use rg_02_resolver::{ClaimStore, InMemoryClaimStore, ResolverResponder, StoredClaim};
use rg_03_registration::{
    DiscoveryResponder, RegistrationApi, RegistrationClient, RegistrationEndpoint,
};
use shared_bus::InMemoryBus;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

pub use container::{ConfigError, RuntimeConfig, ServiceContainer};

/// The runtime orchestrating every endpoint.
pub struct AuthRuntime {
    /// Service container with all initialized components.
    container: Arc<ServiceContainer>,
    /// Shutdown signal for the intake endpoints.
    shutdown_tx: watch::Sender<bool>,
    /// Intake shutdown receiver.
    shutdown_rx: watch::Receiver<bool>,
    /// Shutdown signal for the resolver; sent once intake has drained.
    resolver_shutdown_tx: watch::Sender<bool>,
    /// Resolver shutdown receiver.
    resolver_shutdown_rx: watch::Receiver<bool>,
    /// Running intake tasks (registration, discovery).
    tasks: Mutex<Vec<(&'static str, JoinHandle<()>)>>,
    /// Running resolver task.
    resolver_task: Mutex<Option<JoinHandle<()>>>,
}

impl AuthRuntime {
    /// Create a runtime from configuration.
    ///
    /// # Errors
    ///
    /// `ConfigError` if the key material is missing or invalid.
    pub fn new(config: RuntimeConfig) -> Result<Self, ConfigError> {
        info!("Creating registration runtime");

        let container = Arc::new(ServiceContainer::new(config)?);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (resolver_shutdown_tx, resolver_shutdown_rx) = watch::channel(false);

        Ok(Self {
            container,
            shutdown_tx,
            shutdown_rx,
            resolver_shutdown_tx,
            resolver_shutdown_rx,
            tasks: Mutex::new(Vec::new()),
            resolver_task: Mutex::new(None),
        })
    }

    /// Start every endpoint.
    ///
    /// Each endpoint is subscribed when this returns, so a client may
    /// register immediately afterwards.
    ///
    /// # Errors
    ///
    /// Fails if an endpoint cannot subscribe to its subject.
    pub async fn start(&self) -> Result<()> {
        let container = &self.container;
        let subjects = &container.config.subjects;

        // Step 1: Resolver, so the first publication has somewhere to go
        let resolver = ResolverResponder::new(
            Arc::clone(&container.bus),
            Arc::clone(&container.claims),
            container.trusted_operators(),
        )
        .with_subject(subjects.resolver.clone())
        .start(self.resolver_shutdown_rx.clone())
        .context("Failed to start resolver")?;

        // Step 2: Registration endpoint
        let endpoint = RegistrationEndpoint::new(
            Arc::clone(&container.registration),
            Arc::clone(&container.bus),
        )
        .with_subject(subjects.register.clone())
        .start(self.shutdown_rx.clone())
        .context("Failed to start registration endpoint")?;

        // Step 3: Discovery last; clients only find a service that is ready
        let discovery = DiscoveryResponder::new(
            Arc::clone(&container.bus),
            container.registration.service_public_key(),
        )
        .with_subject(subjects.discovery.clone())
        .start(self.shutdown_rx.clone())
        .context("Failed to start discovery responder")?;

        *self.resolver_task.lock() = Some(resolver);
        self.tasks
            .lock()
            .extend([("registration", endpoint), ("discovery", discovery)]);

        info!(
            register = %subjects.register,
            discovery = %subjects.discovery,
            resolver = %subjects.resolver,
            "Registration runtime started"
        );
        Ok(())
    }

    /// A client configured with this runtime's subjects and timeouts.
    #[must_use]
    pub fn client(&self) -> RegistrationClient<InMemoryBus> {
        let config = &self.container.config;
        RegistrationClient::new(Arc::clone(&self.container.bus))
            .with_subjects(
                config.subjects.discovery.clone(),
                config.subjects.register.clone(),
            )
            .with_timeouts(config.timeouts.discovery, config.timeouts.response)
    }

    /// The claim the resolver holds for `client_public_key`.
    #[must_use]
    pub fn resolved_claim(&self, client_public_key: &str) -> Option<StoredClaim> {
        self.container.claims.lookup(client_public_key)
    }

    /// The resolver's claim store.
    #[must_use]
    pub fn claims(&self) -> Arc<InMemoryClaimStore> {
        Arc::clone(&self.container.claims)
    }

    /// The message bus.
    #[must_use]
    pub fn bus(&self) -> Arc<InMemoryBus> {
        Arc::clone(&self.container.bus)
    }

    /// The service container.
    #[must_use]
    pub fn container(&self) -> Arc<ServiceContainer> {
        Arc::clone(&self.container)
    }

    /// Shut down gracefully.
    ///
    /// Stops in reverse start order. Intake endpoints stop taking messages
    /// and in-flight registrations get up to the drain timeout to finish,
    /// with the resolver still acking their publications. Then the resolver
    /// stops and the bus is closed. Calling this twice is harmless.
    pub async fn shutdown(&self) {
        info!("Initiating graceful shutdown...");
        let drain = self.container.config.timeouts.drain;

        self.shutdown_tx.send_replace(true);
        let tasks: Vec<_> = self.tasks.lock().drain(..).collect();
        for (name, task) in tasks {
            await_endpoint(name, task, drain).await;
        }

        self.resolver_shutdown_tx.send_replace(true);
        let resolver = self.resolver_task.lock().take();
        if let Some(task) = resolver {
            await_endpoint("resolver", task, drain).await;
        }

        self.container.bus.close();
        info!("Shutdown complete");
    }
}

/// Wait for an endpoint task to finish, aborting it after `drain`.
async fn await_endpoint(name: &'static str, task: JoinHandle<()>, drain: Duration) {
    let abort = task.abort_handle();
    match tokio::time::timeout(drain, task).await {
        Ok(Ok(())) => debug!(endpoint = name, "Endpoint stopped"),
        Ok(Err(e)) => error!(endpoint = name, error = %e, "Endpoint task failed"),
        Err(_) => {
            warn!(endpoint = name, waited = ?drain, "Endpoint did not drain in time, aborting");
            abort.abort();
        }
    }
}
