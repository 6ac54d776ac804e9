use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::io::ErrorKind;
use thiserror::Error;
use tracing::{error, info};

use super::{SharedState, DASHBOARD_FILE_NAME};
use crate::error::{AppError, StorageError};

/// Handler failure rendered as `{"error": "<message>"}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A query parameter could not be interpreted.
    #[error("{message}")]
    BadRequest { message: String },
    /// No page id or access token was configured.
    #[error("Facebook credentials not found")]
    MissingCredentials,
    /// A static file the route depends on is absent.
    #[error("{path} not found")]
    NotFound { path: String },
    #[error(transparent)]
    App(#[from] AppError),
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ApiError::App(AppError::Storage(err))
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::MissingCredentials | ApiError::App(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "Request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Query string of the metrics endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct MetricsQuery {
    pub demo: Option<String>,
}

/// Interpret a lenient boolean flag, case-insensitively.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

/// `GET /`
pub async fn index(State(state): State<SharedState>) -> Result<Html<String>, ApiError> {
    let path = state.static_dir.join(DASHBOARD_FILE_NAME);
    match tokio::fs::read_to_string(&path).await {
        Ok(html) => Ok(Html(html)),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(ApiError::NotFound {
            path: DASHBOARD_FILE_NAME.to_string(),
        }),
        Err(source) => Err(StorageError::Io {
            path: path.display().to_string(),
            source,
        }
        .into()),
    }
}

/// `GET /favicon.ico`
pub async fn favicon(State(state): State<SharedState>) -> Response {
    match tokio::fs::read(state.static_dir.join("favicon.ico")).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, "image/x-icon")], bytes).into_response(),
        Err(_) => StatusCode::NO_CONTENT.into_response(),
    }
}

/// `GET /dummydata.json`
pub async fn demo_data(State(state): State<SharedState>) -> Result<Response, ApiError> {
    demo_response(&state).await
}

/// `GET /papi/facebook-metrics`
pub async fn facebook_metrics(
    State(state): State<SharedState>,
    query: Result<Query<MetricsQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::BadRequest {
        message: rejection.body_text(),
    })?;
    let demo = match query.demo.as_deref() {
        None => false,
        Some(raw) => parse_flag(raw).ok_or_else(|| ApiError::BadRequest {
            message: format!("invalid value for demo: {}", raw),
        })?,
    };

    if demo {
        info!("Serving demo metrics");
        return demo_response(&state).await;
    }

    let settings = state
        .facebook
        .as_ref()
        .ok_or(ApiError::MissingCredentials)?;
    let report = state.pipeline.run_cycle(settings).await?;
    Ok(Json(report).into_response())
}

async fn demo_response(state: &SharedState) -> Result<Response, ApiError> {
    let body = state.pipeline.store().read_demo().await?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}
