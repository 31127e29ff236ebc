//! TTS voice profile management and cached preview synthesis.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use vo_models::{TTSParams, TTSProfile, VoiceMode};
use vo_tts::{cache_key, merge_params, resolve_profile, sha256_file, upsert_profile, wav_duration_ms, AudioCache, TtsClient};

use crate::error::{ApiError, ApiResult};
use crate::handlers::ids::is_valid_id;
use crate::metrics::record_tts_cache_lookup;
use crate::state::AppState;

/// `POST /projects/{id}/tts/profile`. Upserts a named voice profile.
pub async fn upsert_tts_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(profile): Json<TTSProfile>,
) -> ApiResult<Json<TTSProfile>> {
    if !is_valid_id(&id) {
        return Err(ApiError::bad_request("invalid project id"));
    }

    let mut project = state.storage.load_project(&id).await?;
    upsert_profile(&mut project, profile.clone());
    state.storage.save_project(&project).await?;

    Ok(Json(profile))
}

#[derive(Debug, Deserialize)]
pub struct ProfileQuery {
    pub profile_id: Option<String>,
}

/// `GET /projects/{id}/tts/profile?profile_id=`
pub async fn get_tts_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ProfileQuery>,
) -> ApiResult<Json<TTSProfile>> {
    if !is_valid_id(&id) {
        return Err(ApiError::bad_request("invalid project id"));
    }

    let project = state.storage.load_project(&id).await?;
    let profile = resolve_profile(&project, query.profile_id.as_deref())?;
    Ok(Json(profile.clone()))
}

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub text: String,
    pub duration_ms: i64,
    #[serde(default)]
    pub profile_id: Option<String>,
    #[serde(default)]
    pub params_override: TTSParams,
}

const MIN_PREVIEW_DURATION_MS: i64 = 200;
const MAX_PREVIEW_DURATION_MS: i64 = 60_000;

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub path: String,
    pub duration_ms: i64,
    pub cache_hit: bool,
}

/// `POST /projects/{id}/tts/preview`. Synthesizes (or reuses a
/// content-addressed cache hit for) a short preview clip.
pub async fn tts_preview(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<PreviewRequest>,
) -> ApiResult<Json<PreviewResponse>> {
    if !is_valid_id(&id) {
        return Err(ApiError::bad_request("invalid project id"));
    }
    if !(MIN_PREVIEW_DURATION_MS..=MAX_PREVIEW_DURATION_MS).contains(&req.duration_ms) {
        return Err(ApiError::validation(format!(
            "duration_ms must be within [{MIN_PREVIEW_DURATION_MS}, {MAX_PREVIEW_DURATION_MS}]"
        )));
    }

    let project = state.storage.load_project(&id).await?;
    let profile = resolve_profile(&project, req.profile_id.as_deref())?.clone();
    let params = merge_params(&profile.params, &req.params_override);

    let endpoint = profile.endpoint.clone().unwrap_or_else(|| state.config.tts_endpoint.clone());
    let voice_identity = match profile.voice_mode {
        VoiceMode::PredefinedVoice => profile.predefined_voice_id.clone().unwrap_or_default(),
        VoiceMode::ReferenceAudio => match &profile.audio_prompt_path {
            Some(path) => sha256_file(std::path::Path::new(path)).await?,
            None => String::new(),
        },
    };
    let key = cache_key(&req.text, &params, &endpoint, profile.voice_mode, &voice_identity, &profile.provider);

    let preview_cache = AudioCache::new(state.storage.project_dir(&id).join("cache").join("tts_preview"));

    let (path, cache_hit) = match preview_cache.get(&key).await {
        Some(path) => {
            record_tts_cache_lookup(true);
            (path, true)
        }
        None => {
            record_tts_cache_lookup(false);
            let client = TtsClient::new(state.http_client.clone(), state.config.tts_api_key.clone());
            let audio = client.synthesize(&profile, &req.text, &params).await?;
            let path = preview_cache.put(&key, &audio).await?;
            (path, false)
        }
    };

    let bytes = tokio::fs::read(&path).await?;
    let duration_ms = wav_duration_ms(&bytes).unwrap_or(0);

    Ok(Json(PreviewResponse {
        path: path.display().to_string(),
        duration_ms,
        cache_hit,
    }))
}
