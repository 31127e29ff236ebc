//! Project lifecycle: upload a source video, read the project document,
//! patch its settings.

use axum::extract::{Multipart, Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vo_media::probe_video;
use vo_models::{DemoCaptureExecutionMode, Project, SourceVideo};
use vo_tts::sha256_file;

use crate::error::{ApiError, ApiResult};
use crate::handlers::ids::is_valid_id;
use crate::metrics::record_upload_duration;
use crate::state::AppState;

/// `POST /projects` (multipart, field `file`, filename must end in `.mp4`).
/// Streams the upload to `input.mp4`, computes its sha256, probes it with
/// ffprobe, and initializes a brand-new project document.
pub async fn create_project(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<Project>> {
    let start = std::time::Instant::now();

    let mut file_bytes: Option<Vec<u8>> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("invalid multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or("").to_string();
            if !filename.to_ascii_lowercase().ends_with(".mp4") {
                return Err(ApiError::bad_request("uploaded file must end in .mp4"));
            }
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::bad_request(format!("failed to read upload: {e}")))?;
            file_bytes = Some(bytes.to_vec());
        }
    }

    let bytes = file_bytes.ok_or_else(|| ApiError::bad_request("missing multipart field `file`"))?;

    let project_id = format!("proj_{}", Uuid::new_v4().simple());
    let project_dir = state.storage.project_dir(&project_id);
    tokio::fs::create_dir_all(&project_dir).await?;
    let video_path = project_dir.join("input.mp4");
    tokio::fs::write(&video_path, &bytes).await?;

    let sha256 = sha256_file(&video_path).await?;
    let info = probe_video(&video_path).await?;

    let video = SourceVideo {
        path: video_path.display().to_string(),
        sha256,
        duration_ms: (info.duration * 1000.0).round() as i64,
        width: Some(info.width),
        height: Some(info.height),
        fps: Some(info.fps),
        has_audio: true,
    };

    let project = state.storage.init_project(&project_id, video).await?;

    record_upload_duration(start.elapsed().as_secs_f64());

    Ok(Json(project))
}

/// `GET /projects/{id}`
pub async fn get_project(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Project>> {
    if !is_valid_id(&id) {
        return Err(ApiError::bad_request("invalid project id"));
    }
    let project = state.storage.load_project(&id).await?;
    Ok(Json(project))
}

#[derive(Debug, Deserialize)]
pub struct UpdateSettingsRequest {
    #[serde(default)]
    pub demo_context: Option<String>,
    #[serde(default)]
    pub demo_capture_execution_mode: Option<String>,
    #[serde(default)]
    pub narration_mode: Option<String>,
}

const ALLOWED_NARRATION_MODES: &[&str] = &["tts_only", "unified"];

#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub demo_context: String,
    pub demo_capture_execution_mode: DemoCaptureExecutionMode,
    pub narration_mode: String,
}

/// `PATCH /projects/{id}/settings`. Updates `demo_context` (mirrored to
/// `demo_context.md`), `demo_capture_execution_mode`, and `narration_mode`.
pub async fn update_settings(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateSettingsRequest>,
) -> ApiResult<Json<SettingsResponse>> {
    if !is_valid_id(&id) {
        return Err(ApiError::bad_request("invalid project id"));
    }

    if let Some(mode) = &req.narration_mode {
        if !ALLOWED_NARRATION_MODES.contains(&mode.as_str()) {
            return Err(ApiError::bad_request(format!(
                "narration_mode must be one of {ALLOWED_NARRATION_MODES:?}"
            )));
        }
    }

    let execution_mode = match &req.demo_capture_execution_mode {
        Some(raw) => Some(
            DemoCaptureExecutionMode::parse(raw)
                .ok_or_else(|| ApiError::bad_request(format!("unknown demo_capture_execution_mode {raw:?}")))?,
        ),
        None => None,
    };

    let project = state
        .storage
        .update_settings(&id, |settings| {
            if let Some(ctx) = req.demo_context {
                settings.demo_context = ctx;
            }
            if let Some(mode) = execution_mode {
                settings.demo_capture_execution_mode = mode;
            }
            if let Some(mode) = req.narration_mode {
                settings.narration_mode = mode;
            }
        })
        .await?;

    Ok(Json(SettingsResponse {
        demo_context: project.settings.demo_context,
        demo_capture_execution_mode: project.settings.demo_capture_execution_mode,
        narration_mode: project.settings.narration_mode,
    }))
}
