//! Job status polling.

use axum::extract::{Path, State};
use axum::Json;
use vo_models::{JobId, JobStatusResponse};

use crate::error::{ApiError, ApiResult};
use crate::handlers::ids::is_valid_id;
use crate::state::AppState;

/// `GET /jobs/{job_id}`
pub async fn get_job_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<JobStatusResponse>> {
    if !is_valid_id(&job_id) {
        return Err(ApiError::bad_request("invalid job id"));
    }

    let status = state
        .queue
        .get_job_status(&JobId(job_id.clone()))
        .await?
        .ok_or_else(|| ApiError::not_found(format!("job {job_id:?} not found")))?;

    Ok(Json(status))
}
