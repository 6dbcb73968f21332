//! # Service Instances
//!
//! Builds every component in dependency order:
//!
//! ```text
//! Keys → Bus → Claim issuer (RG-01) → Resolver publisher + store (RG-02) → Registration (RG-03)
//! ```
//!
//! Nothing here is global; each container owns its own bus, so several
//! containers can run side by side in one process.

use std::sync::Arc;

use rg_01_claims::AccountClaimIssuer;
use rg_02_resolver::{BusResolverPublisher, InMemoryClaimStore};
use rg_03_registration::{RegistrationApi, RegistrationService, ServiceKeys};
use shared_bus::InMemoryBus;
use tracing::{info, instrument};

use crate::container::config::{ConfigError, RuntimeConfig};

/// Registration service over the in-memory bus.
pub type ConcreteRegistrationService =
    RegistrationService<AccountClaimIssuer, BusResolverPublisher<InMemoryBus>>;

/// All service instances of one runtime.
pub struct ServiceContainer {
    /// Message bus shared by every component.
    pub bus: Arc<InMemoryBus>,
    /// Claims accepted by the in-process resolver.
    pub claims: Arc<InMemoryClaimStore>,
    /// The registration service.
    pub registration: Arc<ConcreteRegistrationService>,
    /// Validated key material.
    pub keys: ServiceKeys,
    /// Runtime configuration (immutable after initialization).
    pub config: RuntimeConfig,
}

impl ServiceContainer {
    /// Build the container.
    ///
    /// # Errors
    ///
    /// `ConfigError` if the configured keys are missing or unusable.
    #[instrument(name = "service_init", skip(config))]
    pub fn new(config: RuntimeConfig) -> Result<Self, ConfigError> {
        let keys = config.service_keys()?;
        info!(
            operator = %keys.operator().public_key(),
            account = %keys.account().public_key(),
            "Key material loaded"
        );

        let bus = Arc::new(InMemoryBus::new());
        let issuer = AccountClaimIssuer::new(Arc::clone(keys.account()))?;
        let publisher = BusResolverPublisher::new(Arc::clone(&bus))
            .with_subject(config.subjects.resolver.clone())
            .with_timeout(config.timeouts.publish);
        let registration = Arc::new(RegistrationService::new(&keys, issuer, publisher));
        info!(service = %registration.service_public_key(), "Registration service initialized");

        Ok(Self {
            bus,
            claims: Arc::new(InMemoryClaimStore::new()),
            registration,
            keys,
            config,
        })
    }

    /// Operator keys the in-process resolver accepts publications from.
    #[must_use]
    pub fn trusted_operators(&self) -> Vec<String> {
        vec![self.keys.operator().public_key()]
    }
}
