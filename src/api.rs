//! HTTP surface: submit an analysis, poll its progress, fetch the result.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::AppError;
use crate::models::AnalysisResult;
use crate::store::AnalysisStore;
use crate::worker::{spawn_analysis, AnalysisJob};
use crate::youtube::{normalize_video_id, VideoPlatform};

pub struct AppState {
    pub store: Arc<AnalysisStore>,
    pub platform: Arc<dyn VideoPlatform>,
    /// Deadline for each call made to the video platform
    pub upstream_timeout: Duration,
}

pub const DEFAULT_COMMENT_COUNT: i64 = 100;

fn default_comment_count() -> i64 {
    DEFAULT_COMMENT_COUNT
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    /// Video id or a watch / short link
    #[schema(example = "dQw4w9WgXcQ")]
    #[validate(length(min = 1))]
    pub video_id: String,
    #[serde(default = "default_comment_count")]
    #[schema(example = 100, minimum = 1, maximum = 1000)]
    #[validate(range(min = 1, max = 1000))]
    pub comment_count: i64,
    #[serde(default)]
    pub deep_analysis: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeAccepted {
    pub video_id: String,
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgressResponse {
    pub video_id: String,
    /// 0-100, or -1 when the last analysis failed
    pub progress: i32,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisStatus {
    pub video_id: String,
    pub message: String,
    pub progress: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(value_type = Object)]
    pub error: serde_json::Value,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/analyze", post(start_analysis))
        .route("/api/analyze/:video_id", get(get_analysis))
        .route("/api/analyze/:video_id/progress", get(get_progress))
        .with_state(state)
}

/// Name of a request field as it appears in the JSON body.
fn wire_name(field: &'static str) -> &'static str {
    match field {
        "video_id" => "videoId",
        "comment_count" => "commentCount",
        "deep_analysis" => "deepAnalysis",
        other => other,
    }
}

/// Re-keys derive-generated field errors to the body's camelCase names.
fn request_errors(errors: ValidationErrors) -> AppError {
    let mut keyed = ValidationErrors::new();
    for (field, field_errors) in errors.field_errors() {
        for error in field_errors.iter() {
            keyed.add(wire_name(field), error.clone());
        }
    }
    AppError::Validation(keyed)
}

fn invalid_video_id() -> AppError {
    let mut error = ValidationError::new("video_link");
    error.message = Some("Could not find a video id in the given link".into());
    let mut errors = ValidationErrors::new();
    errors.add(wire_name("video_id"), error);
    AppError::Validation(errors)
}

/// Submit a video for analysis
#[utoipa::path(
    post,
    path = "/api/analyze",
    request_body = AnalyzeRequest,
    responses(
        (status = 202, description = "Analysis started", body = AnalyzeAccepted),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Analysis for this video already running", body = AnalysisStatus)
    ),
    tag = "analysis"
)]
pub async fn start_analysis(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(req) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    req.validate().map_err(request_errors)?;

    let video_id = normalize_video_id(&req.video_id).ok_or_else(invalid_video_id)?;

    let job_id = match state.store.begin_job(&video_id) {
        Ok(job_id) => job_id,
        Err(progress) => {
            info!("⏳ Rejecting duplicate submission for {} ({}%)", video_id, progress);
            let body = AnalysisStatus {
                video_id,
                message: "Analysis already in progress".to_string(),
                progress,
            };
            return Ok((StatusCode::CONFLICT, Json(body)).into_response());
        }
    };

    let job = AnalysisJob {
        job_id,
        video_id: video_id.clone(),
        comment_count: req.comment_count as usize,
        deep_analysis: req.deep_analysis,
    };
    spawn_analysis(state.clone(), job);

    let body = AnalyzeAccepted {
        video_id,
        message: "Analysis started".to_string(),
    };
    Ok((StatusCode::ACCEPTED, Json(body)).into_response())
}

/// Current progress of the latest analysis for a video
#[utoipa::path(
    get,
    path = "/api/analyze/{video_id}/progress",
    params(("video_id" = String, Path, description = "Video id")),
    responses(
        (status = 200, description = "Progress, 0 when unknown", body = ProgressResponse)
    ),
    tag = "analysis"
)]
pub async fn get_progress(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
) -> Json<ProgressResponse> {
    let progress = state.store.progress(&video_id).unwrap_or(0);
    Json(ProgressResponse { video_id, progress })
}

/// Analysis result for a video
#[utoipa::path(
    get,
    path = "/api/analyze/{video_id}",
    params(("video_id" = String, Path, description = "Video id")),
    responses(
        (status = 200, description = "Completed analysis", body = AnalysisResult),
        (status = 202, description = "Analysis running or failed", body = AnalysisStatus),
        (status = 404, description = "No analysis for this video", body = ErrorResponse)
    ),
    tag = "analysis"
)]
pub async fn get_analysis(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
) -> Result<Response, AppError> {
    let job = state.store.job(&video_id);

    if let Some(job) = job.as_ref().filter(|j| j.is_running()) {
        let body = AnalysisStatus {
            video_id,
            message: "Analysis in progress".to_string(),
            progress: job.progress,
        };
        return Ok((StatusCode::ACCEPTED, Json(body)).into_response());
    }

    if let Some(result) = state.store.result(&video_id) {
        return Ok(Json(result).into_response());
    }

    if let Some(job) = job.filter(|j| j.is_failed()) {
        let body = AnalysisStatus {
            video_id,
            message: "Analysis failed".to_string(),
            progress: job.progress,
        };
        return Ok((StatusCode::ACCEPTED, Json(body)).into_response());
    }

    Err(AppError::NotFound("Analysis not found".to_string()))
}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse)),
    tag = "system"
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
