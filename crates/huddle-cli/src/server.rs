use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use huddle_core::constants::{endpoints, wire};
use huddle_core::{ChannelSink, RosterEntry, SessionOrchestrator};
use serde::Deserialize;
use tokio::net::TcpListener;

/// Shared by every request handler.
struct AppState {
    orchestrator: SessionOrchestrator,
}

#[derive(Debug, Deserialize)]
pub struct CollaborateRequest {
    pub request: String,
}

/// Errors returned before a session starts streaming.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = serde_json::json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

pub fn router(orchestrator: SessionOrchestrator) -> Router {
    Router::new()
        .route(endpoints::COLLABORATE_PATH, post(collaborate))
        .route(endpoints::ROSTER_PATH, get(roster))
        .route(endpoints::HEALTH_PATH, get(health))
        .with_state(Arc::new(AppState { orchestrator }))
}

/// Serve until the listener fails.
pub async fn serve(listener: TcpListener, orchestrator: SessionOrchestrator) -> anyhow::Result<()> {
    tracing::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, router(orchestrator)).await?;
    Ok(())
}

/// Start a session and stream its frames as they are produced.
///
/// The session runs on its own task. When the client disconnects the body
/// stream is dropped, which closes the channel; the orchestrator notices
/// before its next model call.
async fn collaborate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CollaborateRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = payload?;
    if body.request.trim().is_empty() {
        return Err(ApiError::BadRequest("request must not be empty".to_string()));
    }

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<String>();
    let orchestrator = state.orchestrator.clone();
    tokio::spawn(async move {
        orchestrator.run(&body.request, ChannelSink::new(tx)).await;
    });

    let stream = async_stream::stream! {
        while let Some(frame) = rx.recv().await {
            yield Ok::<_, Infallible>(frame);
        }
    };

    Response::builder()
        .header(header::CONTENT_TYPE, wire::CONTENT_TYPE)
        .header(header::CACHE_CONTROL, wire::CACHE_CONTROL)
        .header(header::CONNECTION, wire::CONNECTION)
        .body(Body::from_stream(stream))
        .map_err(|e| ApiError::Internal(e.to_string()))
}

async fn roster(State(state): State<Arc<AppState>>) -> Json<Vec<RosterEntry>> {
    Json(state.orchestrator.registry().roster())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
