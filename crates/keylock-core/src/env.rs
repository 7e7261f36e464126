//! Environment variable handling.

use std::env;

/// Get an environment variable, returning None if not set or empty.
pub fn get_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable as a u16 (e.g., for ports).
pub fn get_u16(name: &str) -> Option<u16> {
    get_var(name).and_then(|v| v.parse().ok())
}

/// Get an environment variable as a u64 (e.g., for TTLs in seconds).
pub fn get_u64(name: &str) -> Option<u64> {
    get_var(name).and_then(|v| v.parse().ok())
}

/// Environment variable names Keylock reads.
pub mod vars {
    /// Base directory override (defaults to `~/.keylock`).
    pub const KEYLOCK_HOME: &str = "KEYLOCK_HOME";

    /// Config file override.
    pub const KEYLOCK_CONFIG: &str = "KEYLOCK_CONFIG";

    /// Deployment-wide hashing salt.
    pub const KEYLOCK_SALT: &str = "KEYLOCK_SALT";

    /// Deployment-wide application secret mixed into every digest.
    pub const KEYLOCK_APP_SECRET: &str = "KEYLOCK_APP_SECRET";

    /// Token lifetime override in seconds.
    pub const KEYLOCK_TOKEN_TTL: &str = "KEYLOCK_TOKEN_TTL";

    /// Gateway port override.
    pub const KEYLOCK_PORT: &str = "KEYLOCK_PORT";
}
