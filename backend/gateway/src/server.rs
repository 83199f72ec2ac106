//! Main HTTP Gateway Server.
//!
//! The rewrite middleware sits in front of a small local router that only
//! serves health and answers 404 for everything else.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Serialize;
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{info, instrument};

use playground_config::BackendUrls;
use playground_routing::PathRewriter;

use crate::proxy::rewrite_middleware;

/// Application state shared across routes.
#[derive(Clone)]
pub struct GatewayState {
    pub rewriter: Arc<PathRewriter>,
    pub client: reqwest::Client,
    pub started_at: Instant,
}

impl GatewayState {
    /// Upstream requests fail with `502` once `timeout` elapses.
    pub fn new(backends: BackendUrls, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build upstream HTTP client")?;
        Ok(Self {
            rewriter: Arc::new(PathRewriter::new(backends)),
            client,
            started_at: Instant::now(),
        })
    }
}

#[derive(Serialize)]
struct HealthReport {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    uptime_seconds: u64,
    backends: BackendUrls,
}

/// Handler for `GET /api/health`
async fn health(State(state): State<GatewayState>) -> Json<HealthReport> {
    Json(HealthReport {
        status: "ok",
        service: "nyra-playground",
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        backends: state.rewriter.backends().clone(),
    })
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" })))
}

/// Build the gateway router. The rewrite layer also wraps the fallback, so
/// every inbound path is inspected.
pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(state.clone(), rewrite_middleware))
        .with_state(state)
}

/// Starts the main Axum HTTP server for the gateway.
#[instrument(skip(state))]
pub async fn start_server(addr: SocketAddr, state: GatewayState) -> Result<()> {
    let app = build_router(state);

    info!("Gateway HTTP server listening on {}", addr);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
