//! HTTP gateway for Keylock.
//!
//! This crate provides:
//! - Key-for-token exchange (`/auth/token`)
//! - Key length hint and key rotation (`/auth/keylength`, `/auth/key`)
//! - A token-guarded sample resource (`/info`)
//! - Health reporting (`/health`)

pub mod error;
pub mod handlers;
pub mod server;

pub use error::GatewayError;
pub use server::{bind_address, create_router, Gateway, GatewayState};

/// Result type for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;
