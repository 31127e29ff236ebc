//! Action-timeline validation, demo-capture job submission, and run history.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vo_demo::validate_actions;
use vo_models::{DemoCaptureExecutionMode, DemoRunRecord};
use vo_queue::DemoCaptureJob;

use crate::error::{ApiError, ApiResult};
use crate::handlers::ids::is_valid_id;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ValidateActionsResponse {
    pub action_count: usize,
}

/// `POST /projects/{id}/timeline/actions/validate`
pub async fn validate_timeline_actions(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ValidateActionsResponse>> {
    if !is_valid_id(&id) {
        return Err(ApiError::bad_request("invalid project id"));
    }

    let project = state.storage.load_project(&id).await?;
    validate_actions(&project.timeline.action_events)?;

    Ok(Json(ValidateActionsResponse {
        action_count: project.timeline.action_events.len(),
    }))
}

#[derive(Debug, Serialize)]
pub struct DemoRunEnqueueResponse {
    pub job_id: String,
    pub run_id: String,
    pub run_type: &'static str,
    pub status_url: String,
    pub execution_mode: DemoCaptureExecutionMode,
}

/// `POST /projects/{id}/demo/run`. Enqueues a demo-capture job against the
/// project's currently resolved execution mode.
pub async fn run_demo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DemoRunEnqueueResponse>> {
    if !is_valid_id(&id) {
        return Err(ApiError::bad_request("invalid project id"));
    }

    let project = state.storage.load_project(&id).await?;
    validate_actions(&project.timeline.action_events)?;

    let run_id = format!("run_{}", Uuid::new_v4().simple());
    let job = DemoCaptureJob::new(&id, &run_id);
    let job_id = state.queue.enqueue_demo_capture(job).await?;

    Ok(Json(DemoRunEnqueueResponse {
        status_url: format!("/jobs/{job_id}"),
        job_id,
        run_id,
        run_type: "demo_capture",
        execution_mode: project.settings.demo_capture_execution_mode,
    }))
}

/// `GET /projects/{id}/demo/runs`. History, newest first.
pub async fn list_demo_runs(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<DemoRunRecord>>> {
    if !is_valid_id(&id) {
        return Err(ApiError::bad_request("invalid project id"));
    }

    let project = state.storage.load_project(&id).await?;
    let mut runs = project.demo.runs;
    runs.reverse();
    Ok(Json(runs))
}
