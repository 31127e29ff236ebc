//! Narration-script import and the canonical timeline document.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use vo_models::{Timeline, SCHEMA_VERSION};
use vo_timeline::{detect_import_format, import_timeline_as, validate_cross_field, ImportFormat};

use crate::error::{ApiError, ApiResult};
use crate::handlers::ids::is_valid_id;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ImportTimelineRequest {
    pub content: String,
    #[serde(default = "default_import_format")]
    pub import_format: String,
    #[serde(default)]
    pub source_name: Option<String>,
}

fn default_import_format() -> String {
    "auto".to_string()
}

#[derive(Debug, Serialize)]
pub struct ImportTimelineResponse {
    pub narration_events: usize,
    pub action_events: usize,
    pub schema_version: String,
    pub timeline_version: String,
}

/// `POST /projects/{id}/timeline/import`. Sets `narration_mode=tts_only`.
pub async fn import_timeline(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ImportTimelineRequest>,
) -> ApiResult<Json<ImportTimelineResponse>> {
    if !is_valid_id(&id) {
        return Err(ApiError::bad_request("invalid project id"));
    }

    let timeline = match req.import_format.as_str() {
        "auto" => {
            let format = detect_import_format(req.source_name.as_deref(), &req.content)?;
            import_timeline_as(format, &req.content)?
        }
        "timestamped_txt" => import_timeline_as(ImportFormat::TimestampedTxt, &req.content)?,
        "srt" => import_timeline_as(ImportFormat::Srt, &req.content)?,
        "json" => import_timeline_as(ImportFormat::Json, &req.content)?,
        other => {
            return Err(ApiError::bad_request(format!(
                "import_format must be one of auto, timestamped_txt, srt, json; got {other:?}"
            )))
        }
    };

    state.storage.set_timeline(&id, timeline.clone()).await?;
    state
        .storage
        .update_settings(&id, |settings| settings.narration_mode = "tts_only".to_string())
        .await?;

    Ok(Json(ImportTimelineResponse {
        narration_events: timeline.narration_events.len(),
        action_events: timeline.action_events.len(),
        schema_version: SCHEMA_VERSION.to_string(),
        timeline_version: timeline.timeline_version,
    }))
}

/// `GET /projects/{id}/timeline`
pub async fn get_timeline(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Timeline>> {
    if !is_valid_id(&id) {
        return Err(ApiError::bad_request("invalid project id"));
    }
    let project = state.storage.load_project(&id).await?;
    Ok(Json(project.timeline))
}

#[derive(Debug, Deserialize)]
pub struct PatchNarrationEventRequest {
    #[serde(default)]
    pub start_ms: Option<i64>,
    #[serde(default)]
    pub end_ms: Option<i64>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub voice_profile_id: Option<Option<String>>,
}

/// `PATCH /projects/{id}/timeline/narration/{event_id}`. Partial update;
/// re-normalizes (nothing to re-sort for a single narration event) and
/// revalidates the full timeline before persisting.
pub async fn patch_narration_event(
    State(state): State<AppState>,
    Path((id, event_id)): Path<(String, String)>,
    Json(req): Json<PatchNarrationEventRequest>,
) -> ApiResult<Json<Timeline>> {
    if !is_valid_id(&id) {
        return Err(ApiError::bad_request("invalid project id"));
    }

    let mut project = state.storage.load_project(&id).await?;

    let event = project
        .timeline
        .narration_events
        .iter_mut()
        .find(|e| e.id == event_id)
        .ok_or_else(|| ApiError::not_found(format!("narration event {event_id:?} not found")))?;

    if let Some(start_ms) = req.start_ms {
        event.start_ms = start_ms;
    }
    if let Some(end_ms) = req.end_ms {
        event.end_ms = end_ms;
    }
    if let Some(text) = req.text {
        event.text = text;
    }
    if let Some(voice_profile_id) = req.voice_profile_id {
        event.voice_profile_id = voice_profile_id;
    }

    validate_cross_field(&project.timeline)?;

    state.storage.set_timeline(&id, project.timeline.clone()).await?;

    Ok(Json(project.timeline))
}
