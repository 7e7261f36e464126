//! Configuration management commands.

use clap::Args;
use keylock_core::config::Config;
use keylock_core::SecretString;
use rand::rngs::OsRng;
use rand::RngCore;
use serde_json::Value;
use std::path::Path;

use crate::load_config;

/// Config command arguments.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(clap::Subcommand)]
pub enum ConfigCommand {
    /// Show configuration (secrets redacted)
    Show,

    /// Get a configuration value
    Get {
        /// Configuration key (dot-separated path)
        key: String,
    },

    /// Write a new config file with a random salt and application secret
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Show configuration file path
    Path,

    /// Validate configuration
    Validate,
}

const REDACTED: &str = "[REDACTED]";

/// Random hex string carrying `bytes` bytes of entropy.
fn random_hex(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    OsRng.fill_bytes(&mut buf);
    hex::encode(buf)
}

/// A default config with fresh deployment secrets.
pub fn generate_config() -> Config {
    let mut config = Config::default();
    config.auth.salt = SecretString::new(random_hex(16));
    config.auth.app_secret = SecretString::new(random_hex(32));
    config
}

/// Config as JSON with the salt and application secret masked.
pub fn redacted_json(config: &Config) -> anyhow::Result<Value> {
    let mut json = serde_json::to_value(config)?;
    if let Some(auth) = json.get_mut("auth").and_then(Value::as_object_mut) {
        for field in ["salt", "app_secret"] {
            if let Some(value) = auth.get_mut(field) {
                if value.as_str().is_some_and(|s| !s.is_empty()) {
                    *value = Value::String(REDACTED.to_string());
                }
            }
        }
    }
    Ok(json)
}

/// Run the config command.
pub async fn run(args: ConfigArgs, config_path: &Path) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let config = load_config(config_path)?;
            let json = redacted_json(&config)?;
            println!("{}", serde_json::to_string_pretty(&json)?);
        }

        ConfigCommand::Get { key } => {
            let config = load_config(config_path)?;
            let json = redacted_json(&config)?;

            let value = key
                .split('.')
                .fold(Some(&json), |acc, k| acc.and_then(|v| v.get(k)));

            match value {
                Some(v) => println!("{}", serde_json::to_string_pretty(v)?),
                None => anyhow::bail!("Key not found: {}", key),
            }
        }

        ConfigCommand::Init { force } => {
            if config_path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists: {:?}. Use --force to overwrite.",
                    config_path
                );
            }

            let config = generate_config();
            config.validate()?;
            config.save(config_path)?;

            println!("Created config file: {:?}", config_path);
            println!("  Tip: Run 'keylock set-key' to choose the shared key.");
        }

        ConfigCommand::Path => {
            println!("{}", config_path.display());
        }

        ConfigCommand::Validate => {
            let config = load_config(config_path)?;
            match config.validate() {
                Ok(_) => println!("Configuration is valid"),
                Err(e) => anyhow::bail!("Configuration error: {}", e),
            }
        }
    }

    Ok(())
}
