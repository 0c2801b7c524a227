//! HTTP surface
//!
//! Thin axum handlers over the pipeline: health, diagnostics and media
//! resolution. Errors leave as `{"detail": ...}` with a status derived from
//! the [`ResolverError`] variant.

use crate::network::NetworkProbe;
use crate::resolver::{DiagnosticsBuilder, MediaRequest, MediaResolver, ReportOutcome, ResolvedMedia};
use crate::utils::error::ResolverError;
use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

#[derive(Clone)]
pub struct AppState {
    pub probe: Arc<dyn NetworkProbe>,
    pub resolver: Arc<MediaResolver>,
    pub diagnostics: Arc<DiagnosticsBuilder>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<ResolverError> for ApiError {
    fn from(err: ResolverError) -> Self {
        let status = match &err {
            ResolverError::DnsUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ResolverError::NotFound(_) => StatusCode::NOT_FOUND,
            ResolverError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            detail: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "detail": self.detail });
        (self.status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub dns_resolution: String,
    pub alternative_dns: String,
    pub timestamp: f64,
}

#[derive(Debug, Default, Deserialize)]
pub struct MediaQuery {
    pub url: Option<String>,
    pub title: Option<String>,
}

impl MediaQuery {
    /// A URL wins over a title when both are given
    fn into_request(self) -> Result<MediaRequest, ResolverError> {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        match (non_empty(self.url), non_empty(self.title)) {
            (Some(url), _) => Ok(MediaRequest::Url(url)),
            (None, Some(title)) => Ok(MediaRequest::Title(title)),
            (None, None) => Err(ResolverError::InvalidRequest(
                "either 'url' or 'title' must be provided".to_string(),
            )),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/test-youtube-access", get(test_youtube_access))
        .route("/video-info", get(video_info))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding to {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("running HTTP server")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        error!("Failed to install Ctrl+C handler: {}", err);
    }
}

/// Status derives from the primary probe only
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let (dns, alternative) = tokio::join!(
        state.probe.probe_primary(),
        state.probe.probe_alternative()
    );

    Json(HealthResponse {
        status: if dns.resolved { "healthy" } else { "unhealthy" }.to_string(),
        dns_resolution: dns.message,
        alternative_dns: alternative.message,
        timestamp: Utc::now().timestamp_micros() as f64 / 1_000_000.0,
    })
}

async fn test_youtube_access(State(state): State<AppState>) -> Json<ReportOutcome> {
    Json(state.diagnostics.run().await)
}

async fn video_info(
    State(state): State<AppState>,
    Query(query): Query<MediaQuery>,
) -> ApiResult<Json<ResolvedMedia>> {
    let request = query.into_request()?;
    let media = state.resolver.resolve(request).await?;
    Ok(Json(media))
}
