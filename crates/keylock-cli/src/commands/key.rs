//! Key management commands.
//!
//! `keylock set-key`, `keylock verify` and `keylock key-length` operate on
//! the persisted digest directly, without a running gateway.

use anyhow::Context;
use clap::Args;
use keylock_auth::{AuthError, KeyLock};
use keylock_core::SecretString;
use std::path::Path;

use crate::load_config;

/// `set-key` arguments.
#[derive(Args)]
pub struct SetKeyArgs {
    /// New key (if omitted, prompts for hidden input)
    #[arg(long)]
    pub value: Option<String>,
}

/// `verify` arguments.
#[derive(Args)]
pub struct VerifyArgs {
    /// Key to check (if omitted, prompts for hidden input)
    #[arg(long)]
    pub value: Option<String>,
}

fn open(config_path: &Path) -> anyhow::Result<KeyLock> {
    let config = load_config(config_path)?;
    config.validate()?;
    KeyLock::from_config(&config).context("failed to open credential store")
}

fn prompt(label: &str) -> anyhow::Result<SecretString> {
    rpassword::prompt_password(label)
        .map(SecretString::new)
        .map_err(|e| anyhow::anyhow!("Failed to read key: {}", e))
}

/// Set or rotate the shared key.
pub async fn set_key(args: SetKeyArgs, config_path: &Path) -> anyhow::Result<()> {
    let keylock = open(config_path)?;

    let key = match args.value {
        Some(v) => SecretString::new(v),
        None => {
            let first = prompt("New key: ")?;
            let second = prompt("Repeat key: ")?;
            if first != second {
                anyhow::bail!("Keys do not match");
            }
            first
        }
    };

    match keylock.rotate_secret(&key).await {
        Ok(()) => {}
        Err(AuthError::EmptySecret) => anyhow::bail!("Key must not be empty"),
        Err(e) => return Err(e.into()),
    }

    println!("Key updated ({} characters).", key.char_count());
    println!("Tokens issued under the previous key remain valid until they expire.");
    Ok(())
}

/// Check a key against the stored digest. Exits non-zero on mismatch.
pub async fn verify(args: VerifyArgs, config_path: &Path) -> anyhow::Result<()> {
    let keylock = open(config_path)?;

    let candidate = match args.value {
        Some(v) => SecretString::new(v),
        None => prompt("Key: ")?,
    };

    if keylock.verify(candidate.expose_secret()).await? {
        println!("Key is valid.");
        Ok(())
    } else {
        anyhow::bail!("Bad key")
    }
}

/// Print the active key's length.
pub async fn key_length(config_path: &Path) -> anyhow::Result<()> {
    let keylock = open(config_path)?;

    match keylock.current_secret_length().await {
        Ok(length) => {
            println!("{}", length);
            Ok(())
        }
        Err(AuthError::NoSecretConfigured) => {
            anyhow::bail!("No key configured. Run 'keylock set-key' first.")
        }
        Err(e) => Err(e.into()),
    }
}
