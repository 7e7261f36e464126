//! Token validation against the ephemeral store.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::ephemeral::EphemeralStore;
use crate::error::{AuthError, Result};

/// Answers whether a presented token is live.
///
/// Validation is a pure read. It never extends a token's lifetime.
pub struct TokenValidator {
    store: Arc<dyn EphemeralStore>,
}

impl TokenValidator {
    pub fn new(store: Arc<dyn EphemeralStore>) -> Self {
        Self { store }
    }

    /// `true` iff `token` was issued and has not expired.
    ///
    /// A missing or empty token is rejected without touching the store.
    #[instrument(skip_all)]
    pub async fn is_valid(&self, token: Option<&str>) -> Result<bool> {
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            return Ok(false);
        };

        let live = self.store.get(token).await?.is_some();
        debug!(live, "token checked");
        Ok(live)
    }

    /// Like [`is_valid`](Self::is_valid), but a dead token is an error.
    pub async fn require(&self, token: Option<&str>) -> Result<()> {
        if self.is_valid(token).await? {
            Ok(())
        } else {
            Err(AuthError::TokenExpiredOrUnknown)
        }
    }
}
