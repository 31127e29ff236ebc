//! API routes.

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, patch, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;

use crate::handlers::demo::{list_demo_runs, run_demo, validate_timeline_actions};
use crate::handlers::health::{health, health_deps};
use crate::handlers::jobs::get_job_status;
use crate::handlers::projects::{create_project, get_project, update_settings};
use crate::handlers::render::{render, run_unified};
use crate::handlers::timeline::{get_timeline, import_timeline, patch_narration_event};
use crate::handlers::tts::{get_tts_profile, tts_preview, upsert_tts_profile};
use crate::metrics::metrics_middleware;
use crate::middleware::{cors_layer, rate_limit_middleware, request_id, request_logging, security_headers, RateLimiterCache};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let project_routes = Router::new()
        .route("/projects", post(create_project).layer(DefaultBodyLimit::max(state.config.max_body_size)))
        .route("/projects/:id", get(get_project))
        .route("/projects/:id/settings", patch(update_settings))
        .route("/projects/:id/timeline/import", post(import_timeline))
        .route("/projects/:id/timeline", get(get_timeline))
        .route("/projects/:id/timeline/narration/:event_id", patch(patch_narration_event))
        .route("/projects/:id/timeline/actions/validate", post(validate_timeline_actions))
        .route("/projects/:id/tts/profile", post(upsert_tts_profile).get(get_tts_profile))
        .route("/projects/:id/tts/preview", post(tts_preview))
        .route("/projects/:id/render", post(render))
        .route("/projects/:id/run", post(run_unified))
        .route("/projects/:id/demo/run", post(run_demo))
        .route("/projects/:id/demo/runs", get(list_demo_runs));

    let job_routes = Router::new().route("/jobs/:job_id", get(get_job_status));

    let rate_limiter = std::sync::Arc::new(RateLimiterCache::new(state.config.rate_limit_rps));

    let api_routes = Router::new()
        .merge(project_routes)
        .merge(job_routes)
        .layer(middleware::from_fn_with_state(
            rate_limiter.clone(),
            rate_limit_middleware,
        ));

    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/health/deps", get(health_deps));

    let metrics_routes = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    Router::new()
        .merge(api_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
