//! Value types for digests, tokens, and key metadata.
//!
//! None of these print their contents under `Debug`, so they can sit in
//! structs that get logged without leaking credentials.

use keylock_core::secret::constant_time_eq;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Non-reversible, deterministic representation of the shared key.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretDigest(Vec<u8>);

impl SecretDigest {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Parse the hex form written by [`SecretDigest::to_hex`].
    pub fn from_hex(encoded: &str) -> Result<Self, hex::FromHexError> {
        hex::decode(encoded.trim()).map(Self)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Byte-for-byte comparison that does not exit early.
    pub fn matches(&self, other: &SecretDigest) -> bool {
        constant_time_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for SecretDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretDigest([REDACTED])")
    }
}

/// Metadata about the active key that is safe to hand to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretMetadata {
    /// Character count of the key as it was set.
    pub length: usize,
}

/// Opaque, time-limited credential exchanged for the shared key.
///
/// Identity is the string itself. Serializes as a bare string.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token([REDACTED])")
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_hex_roundtrip() {
        let digest = SecretDigest::from_bytes(vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(digest.to_hex(), "deadbeef");
        assert_eq!(SecretDigest::from_hex("deadbeef\n").unwrap(), digest);
        assert!(SecretDigest::from_hex("not hex").is_err());
    }

    #[test]
    fn test_digest_matches() {
        let a = SecretDigest::from_bytes(vec![1, 2, 3]);
        let b = SecretDigest::from_bytes(vec![1, 2, 3]);
        let c = SecretDigest::from_bytes(vec![1, 2, 4]);
        assert!(a.matches(&b));
        assert!(!a.matches(&c));
    }

    #[test]
    fn test_debug_is_redacted() {
        let digest = SecretDigest::from_bytes(vec![1, 2, 3]);
        let token = Token::new("abcd-efgh-ijkl-mnop");
        assert_eq!(format!("{:?}", digest), "SecretDigest([REDACTED])");
        assert_eq!(format!("{:?}", token), "Token([REDACTED])");
    }

    #[test]
    fn test_token_serializes_as_string() {
        let token = Token::new("abcd-efgh-ijkl-mnop");
        let json = serde_json::to_string(&token).unwrap();
        assert_eq!(json, "\"abcd-efgh-ijkl-mnop\"");
    }
}
