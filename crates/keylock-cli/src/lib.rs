//! Keylock command-line interface.

pub mod commands;
pub mod logging;

use anyhow::Context;
use clap::{Parser, Subcommand};
use keylock_core::Config;
use std::path::{Path, PathBuf};

/// Keylock - exchange a shared key for short-lived access tokens
#[derive(Parser)]
#[command(name = "keylock")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to config file
    #[arg(short, long, env = "KEYLOCK_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP gateway
    Serve(commands::serve::ServeArgs),

    /// Set or rotate the shared key
    SetKey(commands::key::SetKeyArgs),

    /// Check a key against the stored digest
    Verify(commands::key::VerifyArgs),

    /// Print the length of the active key
    KeyLength,

    /// Configuration management
    Config(commands::config::ConfigArgs),

    /// Show version information
    Version,
}

impl Cli {
    /// Config file path: `--config`, else the default location.
    pub fn config_path(&self) -> anyhow::Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => Ok(Config::default_path()?),
        }
    }
}

/// Load the config file at `path` (defaults if absent) with env overrides.
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let mut config = Config::load_or_default(path)
        .with_context(|| format!("failed to load config from {}", path.display()))?;
    config.apply_env_overrides();
    Ok(config)
}

/// Run the CLI with the given arguments.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config_path()?;

    match cli.command {
        Commands::Serve(args) => commands::serve::run(args, &config_path).await,
        Commands::SetKey(args) => commands::key::set_key(args, &config_path).await,
        Commands::Verify(args) => commands::key::verify(args, &config_path).await,
        Commands::KeyLength => commands::key::key_length(&config_path).await,
        Commands::Config(args) => commands::config::run(args, &config_path).await,
        Commands::Version => {
            println!("keylock {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_version() {
        let cli = Cli::try_parse_from(["keylock", "version"]).unwrap();
        assert!(matches!(cli.command, Commands::Version));
    }

    #[test]
    fn test_parse_config_show() {
        let cli = Cli::try_parse_from(["keylock", "config", "show"]).unwrap();
        match cli.command {
            Commands::Config(args) => {
                assert!(matches!(args.command, commands::config::ConfigCommand::Show));
            }
            _ => panic!("Expected Config command"),
        }
    }

    #[test]
    fn test_parse_config_init_force() {
        let cli = Cli::try_parse_from(["keylock", "config", "init", "--force"]).unwrap();
        match cli.command {
            Commands::Config(args) => {
                assert!(matches!(
                    args.command,
                    commands::config::ConfigCommand::Init { force: true }
                ));
            }
            _ => panic!("Expected Config command"),
        }
    }

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from([
            "keylock",
            "serve",
            "--port",
            "9000",
            "--bind",
            "lan",
            "--initial-key",
            "hunter2",
        ])
        .unwrap();
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.port, Some(9000));
                assert_eq!(args.bind.as_deref(), Some("lan"));
                assert_eq!(args.initial_key.as_deref(), Some("hunter2"));
            }
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_parse_set_key() {
        let cli = Cli::try_parse_from(["keylock", "set-key", "--value", "hunter2"]).unwrap();
        match cli.command {
            Commands::SetKey(args) => assert_eq!(args.value.as_deref(), Some("hunter2")),
            _ => panic!("Expected SetKey command"),
        }
    }

    #[test]
    fn test_parse_verify_and_key_length() {
        let cli = Cli::try_parse_from(["keylock", "verify"]).unwrap();
        assert!(matches!(cli.command, Commands::Verify(_)));

        let cli = Cli::try_parse_from(["keylock", "key-length"]).unwrap();
        assert!(matches!(cli.command, Commands::KeyLength));
    }

    #[test]
    fn test_parse_global_flags() {
        let cli =
            Cli::try_parse_from(["keylock", "-vv", "--config", "/tmp/k.json5", "version"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config_path().unwrap(), PathBuf::from("/tmp/k.json5"));
    }

    #[test]
    fn test_unknown_command_fails() {
        assert!(Cli::try_parse_from(["keylock", "agent"]).is_err());
    }

    #[test]
    fn test_load_config_missing_file_uses_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = load_config(&dir.path().join("absent.json5")).unwrap();
        assert_eq!(config.gateway.port, 8700);
    }
}
