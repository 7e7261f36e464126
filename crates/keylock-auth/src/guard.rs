//! Transport-neutral token check placed in front of protected operations.
//!
//! The guard knows nothing about HTTP. A transport extracts the token from
//! its request, asks the guard, and turns a [`Rejection`] into whatever its
//! failure response looks like.

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use crate::error::AuthError;
use crate::validator::TokenValidator;

/// Why a guarded call was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionKind {
    /// Missing, unknown, or expired token.
    BadToken,
    /// The token store could not answer.
    Unavailable,
}

/// Structured authorization failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    pub kind: RejectionKind,
    pub message: String,
}

impl Rejection {
    pub fn bad_token() -> Self {
        Self {
            kind: RejectionKind::BadToken,
            message: AuthError::TokenExpiredOrUnknown.to_string(),
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            kind: RejectionKind::Unavailable,
            message: reason.into(),
        }
    }
}

impl From<AuthError> for Rejection {
    fn from(err: AuthError) -> Self {
        if err.is_unavailable() {
            Self::unavailable(err.to_string())
        } else {
            Self::bad_token()
        }
    }
}

/// Runs a handler only when the presented token is live.
#[derive(Clone)]
pub struct TokenGuard {
    validator: Arc<TokenValidator>,
}

impl TokenGuard {
    pub fn new(validator: Arc<TokenValidator>) -> Self {
        Self { validator }
    }

    /// Decide whether `token` may pass.
    pub async fn check(&self, token: Option<&str>) -> Result<(), Rejection> {
        match self.validator.is_valid(token).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(Rejection::bad_token()),
            Err(err) => {
                warn!(error = %err, "token check failed");
                Err(err.into())
            }
        }
    }

    /// Run `handler` if `token` passes; otherwise return the rejection
    /// without calling it.
    pub async fn call<F, Fut, T>(&self, token: Option<&str>, handler: F) -> Result<T, Rejection>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        self.check(token).await?;
        Ok(handler().await)
    }
}
