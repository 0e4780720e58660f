use crate::{
    config::Config,
    errors::AppError,
    metadata::{fetchers::HttpGet, thumbnails, Aggregator, ThumbnailTier, VideoMetadata},
    session::{CopyStatus, Session, ViewState},
    video_id::VideoReference,
};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tokio::signal;

pub struct SharedState {
    pub aggregator: Aggregator,
    pub session: Session,
    pub copied: CopyStatus,
}

impl SharedState {
    pub fn new(aggregator: Aggregator, config: &Config) -> Self {
        Self {
            aggregator,
            session: Session::new(),
            copied: CopyStatus::new(config.copy_status_clear_after()),
        }
    }
}

pub fn router(state: Arc<SharedState>) -> Router {
    Router::new()
        .route("/api/video", post(video))
        .route("/api/state", get(view_state))
        .route("/api/copied", post(copied))
        .route("/api/thumbnail/:id/:tier", get(thumbnail))
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(
                    tower_http::trace::DefaultMakeSpan::new().level(tracing::Level::INFO),
                )
                .on_response(
                    tower_http::trace::DefaultOnResponse::new().level(tracing::Level::INFO),
                ),
        )
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            log::error!("failed to install Ctrl+C handler: {err}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => log::error!("failed to install signal handler: {err}"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    log::warn!("shutting down");
}

pub async fn serve(state: Arc<SharedState>, listen_addr: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    log::info!("listening on {listen_addr}");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

#[derive(Debug)]
struct HttpError(AppError);

impl IntoResponse for HttpError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.0 {
            AppError::InvalidReference => StatusCode::BAD_REQUEST,
            AppError::AggregationFailed(_) => StatusCode::BAD_GATEWAY,
            AppError::Reqwest(_) | AppError::IO(_) | AppError::Other(_) => {
                log::error!("{self:?}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(json!({"error": self.0.to_string()}))).into_response()
    }
}

impl<E> From<E> for HttpError
where
    E: Into<AppError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoRequest {
    pub url: String,
}

async fn video(
    State(state): State<Arc<SharedState>>,
    Json(payload): Json<VideoRequest>,
) -> Result<Json<VideoMetadata>, HttpError> {
    log::debug!("payload: {payload:?}");
    let meta = state.session.submit(&state.aggregator, &payload.url).await?;
    Ok(Json(meta))
}

#[derive(Debug, Clone, Serialize)]
pub struct StateResponse {
    #[serde(flatten)]
    pub view: ViewState,
    pub copied: Option<String>,
}

async fn view_state(State(state): State<Arc<SharedState>>) -> Json<StateResponse> {
    Json(StateResponse {
        view: state.session.state().await,
        copied: state.copied.current(),
    })
}

#[derive(Debug, Clone, Deserialize)]
pub struct CopiedRequest {
    pub label: String,
}

async fn copied(
    State(state): State<Arc<SharedState>>,
    Json(payload): Json<CopiedRequest>,
) -> StatusCode {
    state.copied.mark(&payload.label);
    StatusCode::NO_CONTENT
}

async fn thumbnail(
    State(state): State<Arc<SharedState>>,
    Path((id, tier)): Path<(String, String)>,
) -> Result<axum::response::Response, HttpError> {
    let id = VideoReference::new(&id)?;
    let tier: ThumbnailTier = match tier.parse() {
        Ok(tier) => tier,
        Err(msg) => {
            return Ok((StatusCode::BAD_REQUEST, Json(json!({"error": msg}))).into_response())
        }
    };

    let url = thumbnails::thumbnail_url(state.aggregator.thumbnail_host(), &id, tier);
    let resp = state
        .aggregator
        .http()
        .get(&url)
        .await
        .map_err(|e| AppError::Other(anyhow::anyhow!("thumbnail fetch failed: {e}")))?;

    if !resp.is_success() {
        return Ok((
            StatusCode::NOT_FOUND,
            Json(json!({"error": format!("{tier} thumbnail not available")})),
        )
            .into_response());
    }

    let content_type = resp.content_type.unwrap_or_else(|| "image/jpeg".to_string());
    let disposition = format!("attachment; filename=\"{id}-{tier}.jpg\"");

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        resp.body,
    )
        .into_response())
}
