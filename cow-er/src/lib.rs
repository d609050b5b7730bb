//! cow-er library - Colours of Wine expert review service
//!
//! Generates wine visualizations from tasting descriptions, stores them, and
//! lets experts rate them through a small HTTP API and review page.

use axum::Router;
use chrono::{DateTime, Utc};
use cow_common::config::DEFAULT_IMAGE_SIZE;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod api;
pub mod db;
pub mod error;
pub mod imagegen;
pub mod remote;
pub mod workflow;

pub use error::{ApiError, ApiResult};

use imagegen::{clamp_size, ImageSynthesizer, SwatchSynthesizer};
use remote::RemoteImageClient;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Primary renderer
    pub synthesizer: Arc<dyn ImageSynthesizer>,
    /// Secondary renderer, `None` when no token is configured
    pub remote: Option<RemoteImageClient>,
    /// Edge length of primary images in pixels
    pub image_size: u32,
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    /// State with the swatch synthesizer and no remote renderer
    pub fn new(db: SqlitePool) -> Self {
        Self {
            db,
            synthesizer: Arc::new(SwatchSynthesizer),
            remote: None,
            image_size: DEFAULT_IMAGE_SIZE,
            startup_time: Utc::now(),
        }
    }

    pub fn with_remote(mut self, remote: RemoteImageClient) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn with_image_size(mut self, size: u32) -> Self {
        self.image_size = clamp_size(size);
        self
    }

    pub fn with_synthesizer(mut self, synthesizer: Arc<dyn ImageSynthesizer>) -> Self {
        self.synthesizer = synthesizer;
        self
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::ui_routes())
        .merge(api::health_routes())
        .merge(api::visualization_routes())
        .merge(api::analysis_routes())
        .merge(api::stats_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
