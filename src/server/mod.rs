//! HTTP service: router, shared state, and bind configuration.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::domain::ForecasterConfig;
use crate::error::AppError;

pub mod routes;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;

/// Where the service listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    /// Read `HOST` / `PORT` (after loading `.env`, if any).
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let host = std::env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .trim()
                .parse()
                .map_err(|_| AppError::input(format!("PORT must be a valid port number, got '{raw}'.")))?,
            Err(_) => DEFAULT_PORT,
        };
        Ok(Self { host, port })
    }
}

/// State shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ForecasterConfig>,
}

impl AppState {
    pub fn new(config: ForecasterConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health))
        .route("/forecast/", post(routes::forecast))
        .route("/forecast", post(routes::forecast))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Bind and serve until Ctrl-C.
pub async fn serve(server: ServerConfig, forecaster: ForecasterConfig) -> Result<(), AppError> {
    let listener = TcpListener::bind((server.host.as_str(), server.port))
        .await
        .map_err(|e| AppError::input(format!("Failed to bind {}:{}: {e}", server.host, server.port)))?;
    let addr = listener
        .local_addr()
        .map_err(|e| AppError::internal(format!("Failed to read bound address: {e}")))?;

    info!("stock-forecast v{} listening on {}", env!("CARGO_PKG_VERSION"), addr);

    axum::serve(listener, router(AppState::new(forecaster)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
