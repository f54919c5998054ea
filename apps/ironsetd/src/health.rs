//! Liveness endpoint for hosting platforms that probe over HTTP.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::info;

pub fn router() -> Router {
    Router::new()
        .route("/", get(healthz))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(listen: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .with_context(|| format!("failed to bind health listener on {listen}"))?;
    info!(listen = %listen, "health endpoint listening");
    axum::serve(listener, router())
        .await
        .context("health server stopped")?;
    Ok(())
}

async fn healthz() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "ironsetd"
    }))
}
