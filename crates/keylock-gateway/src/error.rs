//! Gateway error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use keylock_auth::{AuthError, Rejection, RejectionKind};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Errors that can occur in the gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Credential or token failure from the auth core.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// `/auth/token` was called without a `key` parameter.
    #[error("No key provided")]
    MissingKey,

    /// The request body could not be read.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A backing store could not answer.
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Auth(err) => match err {
                AuthError::BadSecret
                | AuthError::TokenExpiredOrUnknown
                | AuthError::EmptySecret => StatusCode::BAD_REQUEST,
                AuthError::NoSecretConfigured
                | AuthError::StoreUnavailable(_)
                | AuthError::Hashing(_) => StatusCode::SERVICE_UNAVAILABLE,
                AuthError::InvalidConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::MissingKey | Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Io(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message placed in the response body.
    ///
    /// Infrastructure details stay in the logs.
    fn public_message(&self) -> String {
        match self.status() {
            StatusCode::SERVICE_UNAVAILABLE => match self {
                Self::Auth(AuthError::NoSecretConfigured) => self.to_string(),
                _ => "Service unavailable".to_string(),
            },
            StatusCode::INTERNAL_SERVER_ERROR => "Internal error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl From<Rejection> for GatewayError {
    fn from(rejection: Rejection) -> Self {
        match rejection.kind {
            RejectionKind::BadToken => Self::Auth(AuthError::TokenExpiredOrUnknown),
            RejectionKind::Unavailable => Self::Unavailable(rejection.message),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, status = status.as_u16(), "request failed");
        }

        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}
