//! HTTP route handlers.
//!
//! Each handler calls one operation on the [`KeyLock`](keylock_auth::KeyLock)
//! facade and shapes the JSON response.

pub mod auth;
pub mod health;
pub mod info;

use serde::Serialize;

pub use auth::{change_key, get_key_length, get_token};
pub use health::health;
pub use info::secret_info;

/// `{"message": ...}` body used by successful mutations.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
