//! Key exchange, key length, and key rotation endpoints.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::Json;
use keylock_auth::{AuthError, Token};
use keylock_core::SecretString;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::MessageResponse;
use crate::error::GatewayError;
use crate::server::GatewayState;
use crate::Result;

/// Query for `GET /auth/token`.
#[derive(Debug, Deserialize)]
pub struct KeyQuery {
    pub key: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: Token,
}

#[derive(Debug, Serialize)]
pub struct KeyLengthResponse {
    pub keylength: usize,
}

/// Body for `POST /auth/key`.
#[derive(Deserialize)]
pub struct ChangeKeyRequest {
    pub key: Option<SecretString>,
}

/// `GET /auth/token?key=...`: exchange the key for a token.
pub async fn get_token(
    State(state): State<Arc<GatewayState>>,
    Query(query): Query<KeyQuery>,
) -> Result<Json<TokenResponse>> {
    let key = query.key.ok_or(GatewayError::MissingKey)?;
    let key = SecretString::new(key);

    match state.keylock.issue_token(key.expose_secret()).await? {
        Some(token) => Ok(Json(TokenResponse { token })),
        None => Err(AuthError::BadSecret.into()),
    }
}

/// `GET /auth/keylength`: character count of the active key.
pub async fn get_key_length(
    State(state): State<Arc<GatewayState>>,
) -> Result<Json<KeyLengthResponse>> {
    let keylength = state.keylock.current_secret_length().await?;
    Ok(Json(KeyLengthResponse { keylength }))
}

/// `POST /auth/key?token=...` with `{"key": "..."}`: rotate the key.
pub async fn change_key(
    State(state): State<Arc<GatewayState>>,
    body: std::result::Result<Json<ChangeKeyRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>> {
    let Json(request) = body.map_err(|e| GatewayError::InvalidRequest(e.body_text()))?;
    let key = request.key.ok_or(AuthError::BadSecret)?;

    state.keylock.rotate_secret(&key).await?;
    info!("key rotated over HTTP");
    Ok(Json(MessageResponse::new("Success!")))
}
