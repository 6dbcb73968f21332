//! # Service Container
//!
//! Holds the bus, the resolver store and the registration service, built
//! from one [`RuntimeConfig`].

pub mod config;
pub mod services;

pub use config::{ConfigError, KeyConfig, RuntimeConfig, SubjectConfig, TimeoutConfig};
pub use services::{ConcreteRegistrationService, ServiceContainer};
