//! Prometheus metrics for the API server.

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Instant;

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> PrometheusHandle {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "vo_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "vo_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "vo_http_requests_in_flight";

    // Queue metrics
    pub const QUEUE_LENGTH: &str = "vo_queue_length";
    pub const QUEUE_DLQ_LENGTH: &str = "vo_queue_dlq_length";
    pub const JOBS_ENQUEUED_TOTAL: &str = "vo_jobs_enqueued_total";
    pub const JOBS_COMPLETED_TOTAL: &str = "vo_jobs_completed_total";
    pub const JOBS_FAILED_TOTAL: &str = "vo_jobs_failed_total";

    // Processing metrics
    pub const UPLOAD_DURATION_SECONDS: &str = "vo_upload_duration_seconds";
    pub const TTS_CACHE_HITS_TOTAL: &str = "vo_tts_cache_hits_total";
    pub const TTS_CACHE_MISSES_TOTAL: &str = "vo_tts_cache_misses_total";

    // Rate limiting metrics
    pub const RATE_LIMIT_HITS_TOTAL: &str = "vo_rate_limit_hits_total";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Update queue length gauge.
pub fn set_queue_length(length: u64) {
    gauge!(names::QUEUE_LENGTH).set(length as f64);
}

/// Update DLQ length gauge.
pub fn set_dlq_length(length: u64) {
    gauge!(names::QUEUE_DLQ_LENGTH).set(length as f64);
}

/// Record job enqueued.
pub fn record_job_enqueued(run_type: &str) {
    let labels = [("type", run_type.to_string())];
    counter!(names::JOBS_ENQUEUED_TOTAL, &labels).increment(1);
}

/// Record job completed.
pub fn record_job_completed(run_type: &str) {
    let labels = [("type", run_type.to_string())];
    counter!(names::JOBS_COMPLETED_TOTAL, &labels).increment(1);
}

/// Record job failed.
pub fn record_job_failed(run_type: &str) {
    let labels = [("type", run_type.to_string())];
    counter!(names::JOBS_FAILED_TOTAL, &labels).increment(1);
}

/// Record a source-video upload's duration.
pub fn record_upload_duration(duration_secs: f64) {
    histogram!(names::UPLOAD_DURATION_SECONDS).record(duration_secs);
}

/// Record a TTS preview cache hit or miss.
pub fn record_tts_cache_lookup(hit: bool) {
    if hit {
        counter!(names::TTS_CACHE_HITS_TOTAL).increment(1);
    } else {
        counter!(names::TTS_CACHE_MISSES_TOTAL).increment(1);
    }
}

/// Record rate limit hit.
pub fn record_rate_limit_hit(endpoint: &str) {
    let labels = [("endpoint", endpoint.to_string())];
    counter!(names::RATE_LIMIT_HITS_TOTAL, &labels).increment(1);
}

/// Sanitize path for metrics labels (remove IDs, etc.).
fn sanitize_path(path: &str) -> String {
    let path = regex_lite::Regex::new(r"[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}")
        .unwrap()
        .replace_all(path, ":id");
    // Normalize project/job ids (alphanumeric/underscore strings after
    // /projects/ or /jobs/).
    let path = regex_lite::Regex::new(r"/projects/[a-zA-Z0-9_-]+")
        .unwrap()
        .replace_all(&path, "/projects/:project_id");
    let path = regex_lite::Regex::new(r"/jobs/[a-zA-Z0-9_-]+")
        .unwrap()
        .replace_all(&path, "/jobs/:job_id");
    let path = regex_lite::Regex::new(r"/narration/[a-zA-Z0-9_-]+")
        .unwrap()
        .replace_all(&path, "/narration/:event_id");
    path.to_string()
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitizes_project_and_job_ids() {
        assert_eq!(
            sanitize_path("/api/projects/proj_abc123/tts/preview"),
            "/api/projects/:project_id/tts/preview"
        );
        assert_eq!(sanitize_path("/api/jobs/job_9f8e"), "/api/jobs/:job_id");
    }
}
