//! # Runtime Configuration
//!
//! Configuration for the registration service, loaded from the environment.
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `OPERATOR_SEED` | Operator seed (`SO...`) | required |
//! | `COMM_ACC_SEED` | Issuing account seed (`SA...`) | required |
//! | `RG_SERVICE_SEED` | Service seed (`SN...`) | generated per run |
//! | `RG_REGISTER_SUBJECT` | Registration subject | `auth.register` |
//! | `RG_DISCOVERY_SUBJECT` | Public-key subject | `auth.pubkey` |
//! | `RG_RESOLVER_SUBJECT` | Resolver update subject | `$SYS.REQ.CLAIMS.UPDATE` |
//! | `RG_PUBLISH_TIMEOUT_MS` | Resolver ack bound | `2000` |
//! | `RG_DRAIN_TIMEOUT_MS` | Shutdown drain bound | `5000` |
//! | `RG_DEMO_CLIENT` | Register a demo client at startup | `true` |
//!
//! ## Security Requirements
//!
//! - Operator and account seeds MUST be present and carry the right role
//! - Seeds never appear in `Debug` output

use rg_02_resolver::DEFAULT_PUBLISH_TIMEOUT;
use rg_03_registration::{ServiceKeys, DEFAULT_DISCOVERY_TIMEOUT, DEFAULT_RESPONSE_TIMEOUT};
use shared_crypto::{CryptoError, KeyPair, KeyRole};
use shared_types::{DISCOVERY_SUBJECT, REGISTER_SUBJECT, RESOLVER_UPDATE_SUBJECT};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Operator seed variable.
pub const OPERATOR_SEED_VAR: &str = "OPERATOR_SEED";
/// Issuing account seed variable.
pub const ACCOUNT_SEED_VAR: &str = "COMM_ACC_SEED";
/// Service seed variable.
pub const SERVICE_SEED_VAR: &str = "RG_SERVICE_SEED";

/// Complete runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Key material.
    pub keys: KeyConfig,
    /// Bus subjects.
    pub subjects: SubjectConfig,
    /// Timeouts.
    pub timeouts: TimeoutConfig,
    /// Register one demo client after startup.
    pub demo_client: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            keys: KeyConfig::default(),
            subjects: SubjectConfig::default(),
            timeouts: TimeoutConfig::default(),
            demo_client: true,
        }
    }
}

impl RuntimeConfig {
    /// Load from the process environment.
    ///
    /// # Errors
    ///
    /// `ConfigError::InvalidValue` if a numeric or boolean variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from any variable lookup; unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// `ConfigError::InvalidValue` if a numeric or boolean variable does not parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        config.keys.operator_seed = lookup(OPERATOR_SEED_VAR);
        config.keys.account_seed = lookup(ACCOUNT_SEED_VAR);
        config.keys.service_seed = lookup(SERVICE_SEED_VAR);

        if let Some(subject) = lookup("RG_REGISTER_SUBJECT") {
            config.subjects.register = subject;
        }
        if let Some(subject) = lookup("RG_DISCOVERY_SUBJECT") {
            config.subjects.discovery = subject;
        }
        if let Some(subject) = lookup("RG_RESOLVER_SUBJECT") {
            config.subjects.resolver = subject;
        }

        if let Some(ms) = lookup("RG_PUBLISH_TIMEOUT_MS") {
            config.timeouts.publish = parse_millis("RG_PUBLISH_TIMEOUT_MS", &ms)?;
        }
        if let Some(ms) = lookup("RG_DRAIN_TIMEOUT_MS") {
            config.timeouts.drain = parse_millis("RG_DRAIN_TIMEOUT_MS", &ms)?;
        }
        if let Some(flag) = lookup("RG_DEMO_CLIENT") {
            config.demo_client = parse_flag("RG_DEMO_CLIENT", &flag)?;
        }

        Ok(config)
    }

    /// Decode and role-check the configured seeds.
    ///
    /// # Errors
    ///
    /// - `ConfigError::MissingSeed` if the operator or account seed is unset
    /// - `ConfigError::InvalidSeed` if a seed does not decode or has the wrong role
    /// - `ConfigError::Keys` if the decoded keys do not form a usable set
    pub fn service_keys(&self) -> Result<ServiceKeys, ConfigError> {
        let operator = decode_seed(
            OPERATOR_SEED_VAR,
            self.keys.operator_seed.as_deref(),
            KeyRole::Operator,
        )?;
        let account = decode_seed(
            ACCOUNT_SEED_VAR,
            self.keys.account_seed.as_deref(),
            KeyRole::Account,
        )?;

        assemble_keys(self.keys.service_seed.as_deref(), operator, account)
    }
}

fn assemble_keys(
    service_seed: Option<&str>,
    operator: KeyPair,
    account: KeyPair,
) -> Result<ServiceKeys, ConfigError> {
    match service_seed {
        Some(seed) => {
            let service = decode_seed(SERVICE_SEED_VAR, Some(seed), KeyRole::Server)?;
            ServiceKeys::new(service, operator, account).map_err(|source| {
                ConfigError::InvalidSeed {
                    var: SERVICE_SEED_VAR,
                    source,
                }
            })
        }
        None => ServiceKeys::with_generated_service(operator, account).map_err(ConfigError::Keys),
    }
}

fn decode_seed(var: &'static str, seed: Option<&str>, role: KeyRole) -> Result<KeyPair, ConfigError> {
    let seed = seed
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(ConfigError::MissingSeed(var))?;
    let key = KeyPair::from_seed(seed).map_err(|source| ConfigError::InvalidSeed { var, source })?;
    key.require_role(role)
        .map_err(|source| ConfigError::InvalidSeed { var, source })?;
    Ok(key)
}

fn parse_millis(var: &'static str, value: &str) -> Result<Duration, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|ms| *ms > 0)
        .map(Duration::from_millis)
        .ok_or_else(|| ConfigError::InvalidValue {
            var,
            value: value.to_string(),
        })
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            var,
            value: value.to_string(),
        }),
    }
}

/// Configuration errors. All are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required seed is not set.
    #[error("{0} is not set")]
    MissingSeed(&'static str),

    /// A seed does not decode or has the wrong role.
    #[error("{var} is invalid: {source}")]
    InvalidSeed {
        /// Variable holding the seed.
        var: &'static str,
        /// Why it was refused.
        source: CryptoError,
    },

    /// The decoded keys do not form a usable key set.
    #[error("service keys are invalid: {0}")]
    Keys(#[source] CryptoError),

    /// A variable does not parse.
    #[error("{var} has invalid value {value:?}")]
    InvalidValue {
        /// Variable name.
        var: &'static str,
        /// Raw value.
        value: String,
    },

    /// The claim issuer could not be built from the account key.
    #[error("Claim issuer unavailable: {0}")]
    Issuer(#[from] rg_01_claims::ClaimError),
}

/// Seeds, as configured. Decoded by [`RuntimeConfig::service_keys`].
#[derive(Clone, Default)]
pub struct KeyConfig {
    /// Operator seed.
    pub operator_seed: Option<String>,
    /// Issuing account seed.
    pub account_seed: Option<String>,
    /// Service seed; a fresh key is generated when unset.
    pub service_seed: Option<String>,
}

impl fmt::Debug for KeyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |seed: &Option<String>| seed.as_ref().map(|_| "<redacted>");
        f.debug_struct("KeyConfig")
            .field("operator_seed", &redact(&self.operator_seed))
            .field("account_seed", &redact(&self.account_seed))
            .field("service_seed", &redact(&self.service_seed))
            .finish()
    }
}

/// Bus subjects.
#[derive(Debug, Clone)]
pub struct SubjectConfig {
    /// Registration requests.
    pub register: String,
    /// Public-key discovery.
    pub discovery: String,
    /// Resolver updates.
    pub resolver: String,
}

impl Default for SubjectConfig {
    fn default() -> Self {
        Self {
            register: REGISTER_SUBJECT.to_string(),
            discovery: DISCOVERY_SUBJECT.to_string(),
            resolver: RESOLVER_UPDATE_SUBJECT.to_string(),
        }
    }
}

/// Timeouts.
#[derive(Debug, Clone)]
pub struct TimeoutConfig {
    /// Wait for the resolver's ack.
    pub publish: Duration,
    /// Wait for in-flight handlers on shutdown.
    pub drain: Duration,
    /// Client wait for discovery.
    pub discovery: Duration,
    /// Client wait for the registration reply.
    pub response: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            publish: DEFAULT_PUBLISH_TIMEOUT,
            drain: Duration::from_secs(5),
            discovery: DEFAULT_DISCOVERY_TIMEOUT,
            response: DEFAULT_RESPONSE_TIMEOUT,
        }
    }
}
