//! Configuration schema definitions.

use crate::secret::SecretString;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// Main Keylock configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Key hashing settings.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Token shape and lifetime.
    #[serde(default)]
    pub tokens: TokenConfig,

    /// HTTP gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Where the key digest is persisted.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Key hashing configuration.
///
/// `salt` and `app_secret` are deployment-wide. Changing either one makes
/// every previously persisted digest unverifiable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Salt passed to Argon2 and appended to the hashed material.
    #[serde(default)]
    pub salt: SecretString,

    /// Application secret appended to the hashed material.
    #[serde(default)]
    pub app_secret: SecretString,

    /// Strip all whitespace from a key before hashing it.
    #[serde(default = "default_true")]
    pub strip_whitespace: bool,

    /// Argon2id cost parameters.
    #[serde(default)]
    pub hashing: HashingConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            salt: SecretString::default(),
            app_secret: SecretString::default(),
            strip_whitespace: true,
            hashing: HashingConfig::default(),
        }
    }
}

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashingConfig {
    /// Memory cost in KiB.
    #[serde(default = "default_memory_kib")]
    pub memory_kib: u32,

    /// Number of passes.
    #[serde(default = "default_iterations")]
    pub iterations: u32,

    /// Degree of parallelism (lanes).
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_kib: default_memory_kib(),
            iterations: default_iterations(),
            parallelism: default_parallelism(),
        }
    }
}

fn default_memory_kib() -> u32 {
    19 * 1024
}

fn default_iterations() -> u32 {
    2
}

fn default_parallelism() -> u32 {
    1
}

/// Token shape and lifetime.
///
/// A token is `segment_count` groups of `segment_length` characters drawn
/// from `alphabet`, joined by `separator`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Seconds a token stays valid after issuance.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// Number of segments per token.
    #[serde(default = "default_segment_count")]
    pub segment_count: usize,

    /// Characters per segment.
    #[serde(default = "default_segment_length")]
    pub segment_length: usize,

    /// Characters a segment is drawn from.
    #[serde(default = "default_alphabet")]
    pub alphabet: String,

    /// Joins segments.
    #[serde(default = "default_separator")]
    pub separator: String,
}

impl TokenConfig {
    /// Number of distinct characters in the alphabet.
    pub fn alphabet_size(&self) -> usize {
        self.alphabet.chars().collect::<HashSet<_>>().len()
    }

    /// Bits of entropy in one token.
    pub fn entropy_bits(&self) -> f64 {
        let symbols = self.segment_count * self.segment_length;
        let size = self.alphabet_size();
        if size < 2 {
            return 0.0;
        }
        symbols as f64 * (size as f64).log2()
    }

    /// Total token length in characters, separators included.
    pub fn token_len(&self) -> usize {
        let separators = self.segment_count.saturating_sub(1) * self.separator.chars().count();
        self.segment_count * self.segment_length + separators
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            segment_count: default_segment_count(),
            segment_length: default_segment_length(),
            alphabet: default_alphabet(),
            separator: default_separator(),
        }
    }
}

fn default_ttl_secs() -> u64 {
    3600
}

fn default_segment_count() -> usize {
    4
}

fn default_segment_length() -> usize {
    4
}

/// ASCII letters followed by digits.
pub const ALPHANUMERIC: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

fn default_alphabet() -> String {
    ALPHANUMERIC.to_string()
}

fn default_separator() -> String {
    "-".to_string()
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Bind mode.
    #[serde(default)]
    pub bind: BindMode,

    /// Port number.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Enable the CORS layer.
    #[serde(default = "default_true")]
    pub cors: bool,

    /// Origins allowed by the CORS layer.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind: BindMode::default(),
            port: default_port(),
            cors: true,
            allowed_origins: default_allowed_origins(),
        }
    }
}

fn default_port() -> u16 {
    8700
}

fn default_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost".to_string(),
        "http://127.0.0.1".to_string(),
    ]
}

/// Bind mode for the gateway.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindMode {
    /// Bind to loopback only (127.0.0.1).
    #[default]
    Loopback,

    /// Bind to all interfaces.
    Lan,
}

/// Durable storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory for the key digest and length hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default)]
    pub level: LogLevel,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

/// Log level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive string understood by `tracing_subscriber::EnvFilter`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

fn default_true() -> bool {
    true
}
