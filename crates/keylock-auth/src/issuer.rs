//! Exchange the shared key for a short-lived token.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, instrument};

use crate::credential::CredentialStore;
use crate::ephemeral::EphemeralStore;
use crate::error::Result;
use crate::token::TokenGenerator;
use crate::types::Token;

/// Value stored against every live token. Only the key's presence matters.
pub const TOKEN_SENTINEL: &[u8] = b"valid";

/// Issues tokens to callers that present the correct key.
pub struct TokenIssuer {
    credentials: Arc<CredentialStore>,
    generator: TokenGenerator,
    store: Arc<dyn EphemeralStore>,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(
        credentials: Arc<CredentialStore>,
        generator: TokenGenerator,
        store: Arc<dyn EphemeralStore>,
        ttl: Duration,
    ) -> Self {
        Self {
            credentials,
            generator,
            store,
            ttl,
        }
    }

    /// Issue a token if `candidate` is the active key.
    ///
    /// A wrong key, or no key configured, yields `Ok(None)` and writes
    /// nothing. A token that was generated but could not be recorded is
    /// never returned.
    #[instrument(skip_all)]
    pub async fn issue(&self, candidate: &str) -> Result<Option<Token>> {
        if !self.credentials.verify_secret(candidate).await? {
            debug!("token refused");
            return Ok(None);
        }

        let token = self.generator.generate();
        self.store
            .set(token.as_str(), TOKEN_SENTINEL, self.ttl)
            .await?;

        info!(ttl_secs = self.ttl.as_secs(), "token issued");
        Ok(Some(token))
    }

    /// Lifetime given to every issued token.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}
