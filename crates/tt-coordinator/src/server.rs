//! HTTP surface of the coordinator.

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};
use tt_types::{SweepSpec, TtError, WorkerResult};

use crate::coordinator::{Coordinator, PingAck, QueryOutcome, ReportAck, SubmitAck};

pub const INDEX_TEMPLATE: &str = "index.html";

#[derive(Debug, Clone)]
pub struct AppState {
    pub coordinator: Arc<Coordinator>,
    pub template_dir: PathBuf,
}

impl AppState {
    pub fn new(coordinator: Coordinator, template_dir: impl Into<PathBuf>) -> Self {
        Self {
            coordinator: Arc::new(coordinator),
            template_dir: template_dir.into(),
        }
    }
}

/// Failure of a façade call, rendered as `{"status":"error","message":...}`.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ApiError(#[from] TtError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            TtError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!(error = %self.0, "request failed");
        } else {
            warn!(error = %self.0, "request rejected");
        }

        let body = Json(json!({
            "status": "error",
            "message": self.0.to_string(),
        }));
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/ping", get(ping))
        .route("/submit_permutations", post(submit_permutations))
        .route("/report_result", post(report_result))
        .route("/results", get(results))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn ping(State(state): State<AppState>) -> Json<PingAck> {
    Json(state.coordinator.ping())
}

async fn index(State(state): State<AppState>) -> Response {
    let path = state.template_dir.join(INDEX_TEMPLATE);
    match tokio::fs::read_to_string(&path).await {
        Ok(page) => Html(page).into_response(),
        Err(e) => {
            error!(path = %path.display(), error = %e, "failed to render index page");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

async fn submit_permutations(
    State(state): State<AppState>,
    Json(spec): Json<SweepSpec>,
) -> ApiResult<Json<SubmitAck>> {
    spec.validate()?;
    let submission = state.coordinator.submit(spec).await?;
    Ok(Json(submission.ack))
}

async fn report_result(
    State(state): State<AppState>,
    Json(result): Json<WorkerResult>,
) -> ApiResult<Json<ReportAck>> {
    result.validate()?;
    Ok(Json(state.coordinator.report(result).await?))
}

async fn results(State(state): State<AppState>) -> ApiResult<Json<QueryOutcome>> {
    Ok(Json(state.coordinator.query().await?))
}
