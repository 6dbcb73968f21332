//! # Outbound Ports (Driven Ports / SPI)

use uuid::Uuid;

/// Source of unique claim names.
pub trait NameSource: Send + Sync {
    /// Return a name no earlier call returned.
    fn next_name(&self) -> String;
}

/// Random names of the form `client-<uuid>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidNames;

impl NameSource for UuidNames {
    fn next_name(&self) -> String {
        format!("client-{}", Uuid::new_v4().simple())
    }
}
