//! HTTP gateway server.

use crate::error::GatewayError;
use crate::handlers;
use crate::Result;
use axum::{
    extract::{Query, Request, State},
    http::{header, HeaderValue, Method},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use keylock_auth::{KeyLock, TokenGuard};
use keylock_core::config::{BindMode, GatewayConfig};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Shared state handed to every handler.
pub struct GatewayState {
    /// Key and token operations.
    pub keylock: Arc<KeyLock>,

    /// Token check for protected routes.
    pub guard: TokenGuard,

    /// When the gateway was created.
    pub started_at: Instant,
}

impl GatewayState {
    pub fn new(keylock: Arc<KeyLock>) -> Self {
        let guard = keylock.guard();
        Self {
            keylock,
            guard,
            started_at: Instant::now(),
        }
    }
}

/// The HTTP gateway server.
pub struct Gateway {
    state: Arc<GatewayState>,
    config: GatewayConfig,
}

impl Gateway {
    /// Create a new gateway.
    pub fn new(config: GatewayConfig, keylock: Arc<KeyLock>) -> Self {
        Self {
            state: Arc::new(GatewayState::new(keylock)),
            config,
        }
    }

    /// Run the gateway server until the process is stopped.
    pub async fn run(&self) -> Result<()> {
        let addr = self.bind_address();

        if self.config.bind != BindMode::Loopback {
            warn!(
                %addr,
                "gateway is reachable from the network; keys and tokens travel in query strings"
            );
        }

        let app = self.router();

        info!("Starting gateway server on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(GatewayError::Io)?;

        axum::serve(listener, app)
            .await
            .map_err(|e| GatewayError::Internal(e.to_string()))?;

        Ok(())
    }

    /// Create the Axum router.
    pub fn router(&self) -> Router {
        create_router(self.state.clone(), &self.config)
    }

    /// Get the bind address.
    pub fn bind_address(&self) -> SocketAddr {
        bind_address(&self.config)
    }
}

/// Build the router for `state`.
///
/// `/auth/key` and `/info` sit behind the token guard; the rest are open.
pub fn create_router(state: Arc<GatewayState>, config: &GatewayConfig) -> Router {
    let protected = Router::new()
        .route("/auth/key", post(handlers::change_key))
        .route("/info", get(handlers::secret_info))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_token));

    let mut router = Router::new()
        .route("/auth/token", get(handlers::get_token))
        .route("/auth/keylength", get(handlers::get_key_length))
        .route("/health", get(handlers::health))
        .merge(protected)
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if config.cors {
        router = router.layer(create_cors_layer(config));
    }

    router
}

/// Query carrying the token on protected routes.
#[derive(Debug, Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

/// Reject the request unless `?token=` names a live token.
async fn require_token(
    State(state): State<Arc<GatewayState>>,
    Query(query): Query<TokenQuery>,
    request: Request,
    next: Next,
) -> Response {
    match state.guard.check(query.token.as_deref()).await {
        Ok(()) => next.run(request).await,
        Err(rejection) => GatewayError::from(rejection).into_response(),
    }
}

/// CORS restricted to the configured origins.
fn create_cors_layer(config: &GatewayConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(Duration::from_secs(3600))
}

/// Socket address for the configured bind mode and port.
pub fn bind_address(config: &GatewayConfig) -> SocketAddr {
    let ip = match config.bind {
        BindMode::Loopback => [127, 0, 0, 1],
        BindMode::Lan => [0, 0, 0, 0],
    };

    SocketAddr::from((ip, config.port))
}
