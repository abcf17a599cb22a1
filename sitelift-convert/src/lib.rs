//! sitelift-convert: static site → React project conversion service
//!
//! Accepts a ZIP of an HTML/CSS/JS site, converts it into a Vite + React +
//! TypeScript project with a Supabase auth scaffold, and streams progress as
//! newline-delimited JSON until a download link for the packaged project is ready.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod workflow;

pub use crate::config::ConvertSettings;
pub use crate::error::{ApiError, ApiResult, ConversionError, ConversionResult};

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Resolved directories and limits
    pub settings: Arc<ConvertSettings>,
    /// Server startup timestamp (for uptime calculation)
    pub startup_time: DateTime<Utc>,
    /// Message of the most recent failed job
    pub last_error: Arc<RwLock<Option<String>>>,
    pub jobs_completed: Arc<AtomicU64>,
    pub jobs_failed: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(settings: ConvertSettings) -> Self {
        Self {
            settings: Arc::new(settings),
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
            jobs_completed: Arc::new(AtomicU64::new(0)),
            jobs_failed: Arc::new(AtomicU64::new(0)),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let downloads = api::download_service(&state.settings);
    let max_upload_bytes = state.settings.max_upload_bytes;

    Router::new()
        .merge(api::convert_routes(max_upload_bytes))
        .merge(api::health_routes())
        .with_state(state)
        .nest_service(config::DOWNLOAD_ROUTE, downloads)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
