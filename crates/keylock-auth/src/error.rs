//! Error types for key verification and token handling.

use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by the credential and token operations.
///
/// A wrong key is not an error: `verify` and `issue` report it as `false`
/// or `None`. `BadSecret` exists for callers that want to turn that signal
/// into a failure.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No key has ever been set.
    #[error("No key configured")]
    NoSecretConfigured,

    /// The presented key did not match.
    #[error("Bad key")]
    BadSecret,

    /// The token was never issued or has expired. The two are indistinguishable.
    #[error("Bad token")]
    TokenExpiredOrUnknown,

    /// A key must contain at least one non-whitespace character.
    #[error("Key must not be empty")]
    EmptySecret,

    /// The ephemeral or durable store failed to respond.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Hashing failed: {0}")]
    Hashing(String),
}

impl AuthError {
    /// Whether the failure came from infrastructure rather than the caller.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_) | Self::Hashing(_))
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        Self::StoreUnavailable(err.to_string())
    }
}

impl From<keylock_core::ConfigError> for AuthError {
    fn from(err: keylock_core::ConfigError) -> Self {
        Self::InvalidConfig(err.to_string())
    }
}

/// Errors raised by store backends.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt record {name}: {reason}")]
    Corrupt { name: String, reason: String },

    #[error("Invalid TTL: {0:?}")]
    InvalidTtl(Duration),

    #[error("Backend error: {0}")]
    Backend(String),
}

/// Convenience result alias for credential and token operations.
pub type Result<T> = std::result::Result<T, AuthError>;
