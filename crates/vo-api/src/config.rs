//! API configuration.

use std::time::Duration;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Rate limit requests per second
    pub rate_limit_rps: u32,
    /// Rate limit burst
    pub rate_limit_burst: u32,
    /// Request timeout
    pub request_timeout: Duration,
    /// Max request body size
    pub max_body_size: usize,
    /// Environment (development/production)
    pub environment: String,
    /// Root directory for project documents and uploaded source videos.
    pub projects_root: String,
    /// Root directory for the content-addressed TTS audio cache.
    pub tts_cache_root: String,
    /// Root directory for demo-capture scratch/output artifacts.
    pub demo_output_root: String,
    /// Default synthesis endpoint for projects that haven't set their own.
    pub tts_endpoint: String,
    /// Default synthesis wire protocol (`chatterbox_tts_json` or `openai_audio_speech`).
    pub tts_mode: String,
    /// API key sent as `Authorization: Bearer` for `openai_audio_speech` mode.
    pub tts_api_key: Option<String>,
    /// Default demo-capture execution mode for newly created projects.
    pub demo_capture_execution_mode: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec!["*".to_string()],
            rate_limit_rps: 10,
            rate_limit_burst: 20,
            request_timeout: Duration::from_secs(30),
            max_body_size: 200 * 1024 * 1024, // 200MB, source video uploads
            environment: "development".to_string(),
            projects_root: "data/projects".to_string(),
            tts_cache_root: "data/tts_cache".to_string(),
            demo_output_root: "data/demo_runs".to_string(),
            tts_endpoint: "http://localhost:8001/tts".to_string(),
            tts_mode: "chatterbox_tts_json".to_string(),
            tts_api_key: None,
            demo_capture_execution_mode: "playwright_optional".to_string(),
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8000),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(|_| vec!["*".to_string()]),
            rate_limit_rps: std::env::var("RATE_LIMIT_RPS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            rate_limit_burst: std::env::var("RATE_LIMIT_BURST")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(20),
            request_timeout: Duration::from_secs(
                std::env::var("REQUEST_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
            max_body_size: std::env::var("MAX_BODY_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(200 * 1024 * 1024),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            projects_root: std::env::var("PROJECTS_ROOT").unwrap_or_else(|_| "data/projects".to_string()),
            tts_cache_root: std::env::var("TTS_CACHE_ROOT").unwrap_or_else(|_| "data/tts_cache".to_string()),
            demo_output_root: std::env::var("DEMO_OUTPUT_ROOT").unwrap_or_else(|_| "data/demo_runs".to_string()),
            tts_endpoint: std::env::var("TTS_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:8001/tts".to_string()),
            tts_mode: std::env::var("TTS_MODE").unwrap_or_else(|_| "chatterbox_tts_json".to_string()),
            tts_api_key: std::env::var("TTS_API_KEY").ok(),
            demo_capture_execution_mode: std::env::var("DEMO_CAPTURE_EXECUTION_MODE")
                .unwrap_or_else(|_| "playwright_optional".to_string()),
        }
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "production"
    }
}
