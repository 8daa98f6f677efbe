//! HTTP API.
//!
//! Endpoints:
//! - `POST /api/ssl/analyze` - body `{ "domain": ".." }`
//! - `GET /api/ssl/analyze?domain=..` - same, as a query
//! - `GET /health` - liveness
//!
//! Bad input and unreachable hosts answer 400 with the error message;
//! anything else answers 500 with a generic message and is logged.

mod handlers;
mod types;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::run::Analyzer;

use handlers::{analyze_get, analyze_post, health_handler};
pub use types::{AnalyzeRequest, ErrorResponse, HealthResponse, ServerState};

/// Builds the router. Exposed separately from [`start_server`] so it can be
/// driven without a socket.
pub fn router(analyzer: Arc<Analyzer>) -> Router {
    Router::new()
        .route("/api/ssl/analyze", post(analyze_post).get(analyze_get))
        .route("/health", get(health_handler))
        .with_state(ServerState { analyzer })
}

/// Binds and serves until Ctrl-C.
pub async fn start_server(bind: &str, port: u16, analyzer: Analyzer) -> Result<(), anyhow::Error> {
    let app = router(Arc::new(analyzer));

    let listener = tokio::net::TcpListener::bind((bind, port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind server to {}:{}: {}", bind, port, e))?;
    let local = listener.local_addr()?;

    log::info!("Server listening on http://{local}/");
    log::info!("  - Analyze: POST http://{local}/api/ssl/analyze");
    log::info!("  - Health: http://{local}/health");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    log::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
