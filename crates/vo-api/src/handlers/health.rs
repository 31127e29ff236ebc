//! Liveness and dependency-readiness probes.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use vo_demo::probe_dependencies;
use vo_models::DemoCaptureExecutionMode;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
}

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

#[derive(Debug, Serialize)]
pub struct DepStatus {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DepsResponse {
    pub ok: bool,
    pub queue: DepStatus,
    pub tts: DepStatus,
    pub browser: DepStatus,
}

/// `GET /health/deps`. Probes the queue backend, the configured TTS
/// endpoint's own `/health`, and local browser-automation capability.
pub async fn health_deps(State(state): State<AppState>) -> Json<DepsResponse> {
    let queue = match state.queue.len().await {
        Ok(_) => DepStatus { ok: true, error: None },
        Err(e) => DepStatus { ok: false, error: Some(e.to_string()) },
    };

    let tts_health_url = format!(
        "{}/health",
        state.config.tts_endpoint.trim_end_matches('/').trim_end_matches("/tts")
    );
    let tts = match state.http_client.get(&tts_health_url).send().await {
        Ok(resp) if resp.status().is_success() => DepStatus { ok: true, error: None },
        Ok(resp) => DepStatus {
            ok: false,
            error: Some(format!("TTS health endpoint returned {}", resp.status())),
        },
        Err(e) => DepStatus { ok: false, error: Some(e.to_string()) },
    };

    let execution_mode = DemoCaptureExecutionMode::parse(&state.config.demo_capture_execution_mode)
        .unwrap_or_default();
    let dependency_status = probe_dependencies(execution_mode);
    let browser = DepStatus {
        ok: dependency_status.ok,
        error: if dependency_status.error.is_empty() {
            None
        } else {
            Some(dependency_status.error)
        },
    };

    let ok = queue.ok && tts.ok && browser.ok;

    Json(DepsResponse { ok, queue, tts, browser })
}
