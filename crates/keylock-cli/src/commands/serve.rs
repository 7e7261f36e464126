//! `keylock serve`: run the HTTP gateway.

use anyhow::Context;
use clap::Args;
use keylock_auth::{FileDigestStore, KeyLock, MemoryEphemeralStore};
use keylock_core::config::{BindMode, Config};
use keylock_core::SecretString;
use keylock_gateway::Gateway;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::load_config;

/// Serve command arguments.
#[derive(Args)]
pub struct ServeArgs {
    /// Bind mode (loopback, lan)
    #[arg(short, long)]
    pub bind: Option<String>,

    /// Port number
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Set this key before accepting requests
    #[arg(long, env = "KEYLOCK_INITIAL_KEY", hide_env_values = true)]
    pub initial_key: Option<String>,

    /// Seconds between sweeps of expired tokens
    #[arg(long, default_value = "60")]
    pub sweep_interval: u64,
}

fn parse_bind(bind: &str) -> anyhow::Result<BindMode> {
    match bind {
        "loopback" => Ok(BindMode::Loopback),
        "lan" => Ok(BindMode::Lan),
        _ => anyhow::bail!("Invalid bind mode: {}", bind),
    }
}

/// Apply command-line overrides on top of the loaded config.
pub fn apply_overrides(config: &mut Config, args: &ServeArgs) -> anyhow::Result<()> {
    if let Some(bind) = &args.bind {
        config.gateway.bind = parse_bind(bind)?;
    }
    if let Some(port) = args.port {
        config.gateway.port = port;
    }
    Ok(())
}

/// Run the serve command.
pub async fn run(args: ServeArgs, config_path: &Path) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    apply_overrides(&mut config, &args)?;
    config.validate()?;

    if args.sweep_interval == 0 {
        anyhow::bail!("--sweep-interval must be at least 1 second");
    }

    let tokens = Arc::new(MemoryEphemeralStore::new());
    let sweeper = tokens.spawn_sweeper(Duration::from_secs(args.sweep_interval));

    let storage_dir = config.storage_dir()?;
    let keylock = KeyLock::new(
        &config,
        Arc::new(FileDigestStore::new(&storage_dir)),
        tokens,
    )
    .context("failed to initialize key store")?;

    if let Some(key) = args.initial_key {
        keylock
            .rotate_secret(&SecretString::new(key))
            .await
            .context("failed to set initial key")?;
        info!("initial key set");
    } else if !keylock.credentials().is_configured().await? {
        warn!(
            dir = %storage_dir.display(),
            "no key configured; token requests will fail until 'keylock set-key' runs"
        );
    }

    info!(
        ttl_secs = config.tokens.ttl_secs,
        storage = %storage_dir.display(),
        "keylock ready"
    );

    let gateway = Gateway::new(config.gateway.clone(), Arc::new(keylock));
    let result = gateway.run().await;
    sweeper.abort();
    result?;

    Ok(())
}
