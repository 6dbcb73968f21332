//! # Registration Runtime
//!
//! Entry point: loads configuration from the environment, starts the
//! registration service with its resolver, optionally registers a demo
//! client, then runs until Ctrl+C.

use anyhow::{Context, Result};
use auth_runtime::{AuthRuntime, RuntimeConfig};
use rg_01_claims::decode_token;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Payload the demo client registers with.
const DEMO_PAYLOAD: &[u8] = b"my_secret_registration_data";

/// Load configuration from the environment.
fn load_config() -> Result<RuntimeConfig> {
    RuntimeConfig::from_env().context("Invalid configuration")
}

/// Register one client against the running service and log the claim.
async fn run_demo_client(runtime: &AuthRuntime) -> Result<()> {
    let client = runtime.client();
    info!(client = %client.public_key(), "Registering demo client");

    let token = client
        .register(DEMO_PAYLOAD)
        .await
        .context("Demo registration failed")?;
    let token = String::from_utf8(token).context("Claim is not UTF-8")?;
    let claim = decode_token(&token).context("Claim does not verify")?;

    info!(
        subject = %claim.subject_public_key,
        name = %claim.name,
        tags = ?claim.tags,
        resolved = runtime.resolved_claim(&claim.subject_public_key).is_some(),
        "Demo client registered"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    // Load configuration
    let config = load_config()?;
    let demo_client = config.demo_client;

    // Create and start the runtime
    let runtime = AuthRuntime::new(config).context("Failed to initialize runtime")?;
    runtime.start().await?;

    if demo_client {
        if let Err(e) = run_demo_client(&runtime).await {
            warn!(error = %format!("{e:#}"), "Demo client failed");
        }
    }

    // Keep running
    info!("Registration service is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    // Graceful shutdown
    runtime.shutdown().await;

    Ok(())
}
