//! Sample protected resource.

use axum::Json;

use super::MessageResponse;

/// `GET /info?token=...`: reachable only with a live token.
pub async fn secret_info() -> Json<MessageResponse> {
    Json(MessageResponse::new("Top-secret information!"))
}
