//! Random, human-typable tokens of a fixed shape.

use keylock_core::config::{TokenConfig, MIN_TOKEN_ENTROPY_BITS};
use rand::rngs::OsRng;
use rand::seq::SliceRandom;

use crate::error::{AuthError, Result};
use crate::types::Token;

/// Produces tokens like `aB3x-9QzK-p0Lm-Tt7e`.
///
/// Every character comes from the operating system's CSPRNG. If that source
/// fails the process panics; there is no weaker fallback.
#[derive(Debug, Clone)]
pub struct TokenGenerator {
    alphabet: Vec<char>,
    segment_count: usize,
    segment_length: usize,
    separator: String,
    token_len: usize,
}

impl TokenGenerator {
    /// Build a generator, rejecting shapes too small to resist guessing.
    pub fn new(config: &TokenConfig) -> Result<Self> {
        let mut alphabet: Vec<char> = Vec::new();
        for c in config.alphabet.chars() {
            if !alphabet.contains(&c) {
                alphabet.push(c);
            }
        }

        if alphabet.len() < 2 {
            return Err(AuthError::InvalidConfig(
                "token alphabet needs at least 2 distinct characters".to_string(),
            ));
        }
        if config.separator.is_empty() {
            return Err(AuthError::InvalidConfig(
                "token separator must not be empty".to_string(),
            ));
        }
        if alphabet.iter().any(|c| config.separator.contains(*c)) {
            return Err(AuthError::InvalidConfig(
                "token alphabet must not contain the separator".to_string(),
            ));
        }
        let bits = config.entropy_bits();
        if bits < MIN_TOKEN_ENTROPY_BITS {
            return Err(AuthError::InvalidConfig(format!(
                "tokens would carry {bits:.1} bits of entropy, \
                 at least {MIN_TOKEN_ENTROPY_BITS} required"
            )));
        }

        Ok(Self {
            alphabet,
            segment_count: config.segment_count,
            segment_length: config.segment_length,
            separator: config.separator.clone(),
            token_len: config.token_len(),
        })
    }

    /// Generate a fresh token.
    pub fn generate(&self) -> Token {
        let mut rng = OsRng;
        let mut out = String::with_capacity(self.token_len());

        for segment in 0..self.segment_count {
            if segment > 0 {
                out.push_str(&self.separator);
            }
            for _ in 0..self.segment_length {
                if let Some(&c) = self.alphabet.choose(&mut rng) {
                    out.push(c);
                }
            }
        }

        Token::new(out)
    }

    /// Whether `candidate` has the shape this generator produces.
    ///
    /// Validation does not depend on this; it is for callers that want to
    /// reject malformed input early.
    pub fn is_well_formed(&self, candidate: &str) -> bool {
        let segments: Vec<&str> = candidate.split(self.separator.as_str()).collect();
        segments.len() == self.segment_count
            && segments.iter().all(|segment| {
                segment.chars().count() == self.segment_length
                    && segment.chars().all(|c| self.alphabet.contains(&c))
            })
    }

    /// Length of every generated token, in characters.
    pub fn token_len(&self) -> usize {
        self.token_len
    }
}
