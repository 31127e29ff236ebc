//! Worker configuration.

use std::time::Duration;

/// Worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Maximum concurrent jobs
    pub max_concurrent_jobs: usize,
    /// Job timeout
    pub job_timeout: Duration,
    /// Graceful shutdown timeout
    pub shutdown_timeout: Duration,
    /// Work directory for render scratch files (mixdowns, SRTs, final MP4s)
    pub work_dir: String,
    /// Root directory for the content-addressed TTS audio cache.
    pub tts_cache_root: String,
    /// Root directory for demo-capture scratch/output artifacts.
    pub demo_output_root: String,
    /// Root directory for project documents (shared with vo-api).
    pub projects_root: String,
    /// API key sent as `Authorization: Bearer` for `openai_audio_speech` mode.
    pub tts_api_key: Option<String>,
    /// How often the worker should scan for orphaned pending jobs
    pub claim_interval: Duration,
    /// Minimum idle time before a pending job can be claimed (crash recovery)
    pub claim_min_idle: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_jobs: 2,
            job_timeout: Duration::from_secs(3600),
            shutdown_timeout: Duration::from_secs(30),
            work_dir: "/tmp/vo-worker".to_string(),
            tts_cache_root: "data/tts_cache".to_string(),
            demo_output_root: "data/demo_runs".to_string(),
            projects_root: "data/projects".to_string(),
            tts_api_key: None,
            claim_interval: Duration::from_secs(30),
            claim_min_idle: Duration::from_secs(300),
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            max_concurrent_jobs: std::env::var("WORKER_MAX_JOBS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2),
            job_timeout: Duration::from_secs(
                std::env::var("WORKER_JOB_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(3600),
            ),
            shutdown_timeout: Duration::from_secs(
                std::env::var("WORKER_SHUTDOWN_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
            work_dir: std::env::var("WORKER_WORK_DIR")
                .unwrap_or_else(|_| "/tmp/vo-worker".to_string()),
            tts_cache_root: std::env::var("TTS_CACHE_ROOT")
                .unwrap_or_else(|_| "data/tts_cache".to_string()),
            demo_output_root: std::env::var("DEMO_OUTPUT_ROOT")
                .unwrap_or_else(|_| "data/demo_runs".to_string()),
            projects_root: std::env::var("PROJECTS_ROOT")
                .unwrap_or_else(|_| "data/projects".to_string()),
            tts_api_key: std::env::var("TTS_API_KEY").ok(),
            claim_interval: Duration::from_secs(
                std::env::var("WORKER_CLAIM_INTERVAL_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
            claim_min_idle: Duration::from_secs(
                std::env::var("WORKER_CLAIM_MIN_IDLE_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(300),
            ),
        }
    }
}
