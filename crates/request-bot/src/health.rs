//! Health check endpoint

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use serenity::prelude::TypeMapKey;
use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::RwLock;

use crate::dispatcher::DispatchStats;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub bot_tag: Option<String>,
    pub uptime_secs: u64,
    pub requests_created: u64,
    pub notes_merged: u64,
    /// Queue messages answered with an error reply
    pub replies_rejected: u64,
}

/// Shared application state for health checks
#[derive(Clone)]
pub struct AppState {
    pub start_time: SystemTime,
    pub bot_tag: Arc<RwLock<Option<String>>>,
    pub stats: Arc<DispatchStats>,
}

impl AppState {
    pub fn new(stats: Arc<DispatchStats>) -> Self {
        Self {
            start_time: SystemTime::now(),
            bot_tag: Arc::new(RwLock::new(None)),
            stats,
        }
    }

    pub async fn set_bot_tag(&self, tag: String) {
        let mut guard = self.bot_tag.write().await;
        *guard = Some(tag);
    }
}

impl TypeMapKey for AppState {
    type Value = AppState;
}

async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthStatus>) {
    let uptime = state.start_time.elapsed().unwrap_or_default().as_secs();
    let bot_tag = state.bot_tag.read().await.clone();
    let stats = state.stats.snapshot();

    (
        StatusCode::OK,
        Json(HealthStatus {
            status: "ok".to_string(),
            bot_tag,
            uptime_secs: uptime,
            requests_created: stats.requests_created,
            notes_merged: stats.notes_merged,
            replies_rejected: stats.replies_rejected,
        }),
    )
}

async fn live_handler() -> StatusCode {
    StatusCode::OK
}

/// Create the health check router
pub fn create_health_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/live", get(live_handler))
        .with_state(state)
}

/// Start the health check server
pub async fn start_health_server(state: AppState, port: u16) -> anyhow::Result<()> {
    let app = create_health_router(state);
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Health check server listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
