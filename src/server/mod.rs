//! HTTP surface: dashboard page, demo payload and the live metrics endpoint.
//!
//! Routes:
//! - `GET /` dashboard HTML
//! - `GET /favicon.ico` icon, or 204 when none is shipped
//! - `GET /papi/facebook-metrics?demo=<bool>` demo payload or a live cycle
//! - `GET /dummydata.json` demo payload
//! - `/static/*` static assets

mod handlers;

pub use handlers::*;

use axum::{routing::get, Router};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::pipeline::AnalyticsPipeline;
use crate::storage::FacebookSettings;

/// Dashboard page served at `/`.
pub const DASHBOARD_FILE_NAME: &str = "FB-Analytics-Dashboard.html";

/// State shared by every handler.
pub struct AppState {
    pub pipeline: AnalyticsPipeline,
    /// Resolved at startup; `None` makes the live endpoint fail.
    pub facebook: Option<FacebookSettings>,
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(
        pipeline: AnalyticsPipeline,
        facebook: Option<FacebookSettings>,
        static_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            pipeline,
            facebook,
            static_dir: static_dir.into(),
        }
    }
}

/// Shared application state handle.
pub type SharedState = Arc<AppState>;

/// Build the router with permissive CORS and request tracing.
pub fn router(state: SharedState) -> Router {
    let assets = ServeDir::new(&state.static_dir);

    Router::new()
        .route("/", get(index))
        .route("/favicon.ico", get(favicon))
        .route("/papi/facebook-metrics", get(facebook_metrics))
        .route("/dummydata.json", get(demo_data))
        .nest_service("/static", assets)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind `host:port` and serve until Ctrl-C.
pub async fn serve(state: SharedState, host: &str, port: u16) -> AppResult<()> {
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Internal {
            message: format!("failed to bind {}: {}", addr, e),
        })?;

    info!(addr = %addr, "HTTP server listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Internal {
            message: format!("server error: {}", e),
        })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
