//! clipscout-api library interface
//!
//! Exposes the router and its state so integration tests can drive the
//! service without binding a socket.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;

pub use crate::error::{ApiError, ApiResult};

use axum::extract::DefaultBodyLimit;
use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::services::search_orchestrator::SearchOrchestrator;
use crate::services::upload_validator::MAX_UPLOAD_BYTES;

/// Extra room over the upload limit for multipart framing, so oversize files
/// still reach the validator and get its message
const BODY_LIMIT_HEADROOM: usize = 1024 * 1024;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Upload processing pipeline
    pub orchestrator: Arc<SearchOrchestrator>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: SqlitePool, orchestrator: SearchOrchestrator) -> Self {
        Self {
            db,
            orchestrator: Arc::new(orchestrator),
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::upload_routes())
        .merge(api::search_routes())
        .merge(api::health_routes())
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + BODY_LIMIT_HEADROOM))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
