use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use sqlx::SqlitePool;
use std::time::Duration;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tower_http::{cors, trace};
use tracing::{Level, warn};

use crate::gemini::GeminiClient;
use crate::rate_limit::RateLimiter;
use crate::storage::PhotoStorage;

mod api;
pub mod error;
mod utils;

/// Per-IP quotas carried over from the original deployment.
const UPLOAD_QUOTA: u32 = 20;
const UPLOAD_WINDOW: Duration = Duration::from_secs(24 * 60 * 60);
const READ_QUOTA: u32 = 100;
const READ_WINDOW: Duration = Duration::from_secs(15 * 60);

pub fn router(app_state: AppStateRef) -> Router {
    Router::new()
        .route("/", get(|| async { "photobooth-server" }))
        .nest("/api", api::router(app_state))
        .nest_service("/photos", ServeDir::new(app_state.storage.photos_dir()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::new().allow_origin(cors::Any))
        // Must stay above the 10MB application limit, oversized uploads
        // get the handler's 400 instead of a transport 413
        .layer(DefaultBodyLimit::max(32 * 1024 * 1024))
}

pub struct AppState {
    pub pool: SqlitePool,
    pub storage: PhotoStorage,
    pub gemini: Option<GeminiClient>,
    pub upload_limiter: RateLimiter,
    pub read_limiter: RateLimiter,
}

impl AppState {
    pub fn new(pool: SqlitePool, storage: PhotoStorage, gemini: Option<GeminiClient>) -> Self {
        Self {
            pool,
            storage,
            gemini,
            upload_limiter: RateLimiter::new(UPLOAD_QUOTA, UPLOAD_WINDOW),
            read_limiter: RateLimiter::new(READ_QUOTA, READ_WINDOW),
        }
    }
}

pub type AppStateRef = &'static AppState;

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {e}")
        }
    };

    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
