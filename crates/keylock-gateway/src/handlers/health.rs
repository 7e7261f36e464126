//! Health endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use tracing::debug;

use crate::server::GatewayState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall health status.
    pub status: String,

    /// Gateway version.
    pub version: String,

    /// Uptime in seconds.
    pub uptime_seconds: u64,

    /// Component health.
    pub components: ComponentHealth,
}

/// Component health status.
#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    /// Whether a key is set and its store answers.
    pub credential: ComponentStatus,
}

/// Individual component status.
#[derive(Debug, Serialize)]
pub struct ComponentStatus {
    /// Status (ok, not_configured, error).
    pub status: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ComponentStatus {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            message: None,
        }
    }

    pub fn not_configured() -> Self {
        Self {
            status: "not_configured".to_string(),
            message: Some("No key has been set".to_string()),
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: Some(msg.into()),
        }
    }
}

/// `GET /health`.
pub async fn health(State(state): State<Arc<GatewayState>>) -> Json<HealthResponse> {
    let credential = match state.keylock.credentials().is_configured().await {
        Ok(true) => ComponentStatus::ok(),
        Ok(false) => ComponentStatus::not_configured(),
        Err(err) => {
            debug!(error = %err, "credential store check failed");
            ComponentStatus::error("credential store unavailable")
        }
    };

    let status = if credential.status == "error" {
        "degraded"
    } else {
        "ok"
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        components: ComponentHealth { credential },
    })
}
