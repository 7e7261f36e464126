//! # keylock-core
//!
//! Configuration, paths, and shared utilities for Keylock.
//!
//! This crate provides functionality shared by every Keylock crate:
//!
//! - **Configuration**: Loading, validation, and persistence of the config file
//! - **Secrets**: A redacting, zero-on-drop string type for credentials
//! - **Utilities**: Path resolution and environment handling

pub mod config;
pub mod env;
pub mod error;
pub mod paths;
pub mod secret;

// Re-exports for convenience
pub use config::Config;
pub use error::{ConfigError, Result};
pub use secret::SecretString;
