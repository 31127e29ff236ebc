//! Render job submission: tts-only narration over the existing source video,
//! or the unified pipeline (demo capture feeding a fresh narration pass).

use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vo_queue::RenderJob;

use crate::error::{ApiError, ApiResult};
use crate::handlers::ids::is_valid_id;
use crate::state::AppState;

#[derive(Debug, Deserialize, Default)]
pub struct RenderRequest {
    #[serde(default)]
    pub profile_override: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EnqueueResponse {
    pub job_id: String,
    pub run_type: &'static str,
    pub status_url: String,
    pub queued_at: DateTime<Utc>,
    pub narration_mode: String,
}

/// `POST /projects/{id}/render`. Narrates over the project's existing
/// source video; never triggers a demo capture.
pub async fn render(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<RenderRequest>,
) -> ApiResult<Json<EnqueueResponse>> {
    if !is_valid_id(&id) {
        return Err(ApiError::bad_request("invalid project id"));
    }

    let project = state.storage.load_project(&id).await?;

    let mut job = RenderJob::new(&id);
    job.profile_override = req.profile_override;

    let queued_at = job.created_at;
    let job_id = state.queue.enqueue_render(job).await?;

    Ok(Json(EnqueueResponse {
        status_url: format!("/jobs/{job_id}"),
        job_id,
        run_type: "render",
        queued_at,
        narration_mode: project.settings.narration_mode,
    }))
}

/// `POST /projects/{id}/run`. Runs a fresh demo capture first, then
/// narrates over its recording (falling back to the source video if the
/// capture produced nothing playable).
pub async fn run_unified(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<RenderRequest>,
) -> ApiResult<Json<EnqueueResponse>> {
    if !is_valid_id(&id) {
        return Err(ApiError::bad_request("invalid project id"));
    }

    let project = state.storage.load_project(&id).await?;

    let demo_run_id = format!("run_{}", Uuid::new_v4().simple());
    let mut job = RenderJob::new(&id).with_demo_run(&demo_run_id);
    job.profile_override = req.profile_override;

    let queued_at = job.created_at;
    let job_id = state.queue.enqueue_render(job).await?;

    Ok(Json(EnqueueResponse {
        status_url: format!("/jobs/{job_id}"),
        job_id,
        run_type: "render",
        queued_at,
        narration_mode: project.settings.narration_mode,
    }))
}
