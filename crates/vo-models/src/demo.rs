//! Demo Runner result records, as persisted in `demo.runs`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Whether the Demo Runner requires the browser or may fall back to a
/// deterministic dry run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DemoCaptureExecutionMode {
    PlaywrightOptional,
    PlaywrightRequired,
}

impl DemoCaptureExecutionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PlaywrightOptional => "playwright_optional",
            Self::PlaywrightRequired => "playwright_required",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "playwright_optional" => Some(Self::PlaywrightOptional),
            "playwright_required" => Some(Self::PlaywrightRequired),
            _ => None,
        }
    }
}

impl Default for DemoCaptureExecutionMode {
    fn default() -> Self {
        Self::PlaywrightOptional
    }
}

/// Terminal mode of a single demo run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DemoRunMode {
    DemoCapturePlaywright,
    DemoCaptureDryRun,
    DemoCaptureFailed,
}

impl DemoRunMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DemoCapturePlaywright => "demo_capture_playwright",
            Self::DemoCaptureDryRun => "demo_capture_dry_run",
            Self::DemoCaptureFailed => "demo_capture_failed",
        }
    }
}

/// Drift statistics across all executed actions in a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DriftStats {
    pub count: usize,
    pub mean: f64,
    pub max: f64,
    pub min: f64,
    pub p95: f64,
}

/// Aggregate counts over all executed actions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ExecutionSummary {
    pub total: usize,
    pub ok: usize,
    pub error: usize,
    pub retries: usize,
    pub timeouts: usize,
}

/// Error rollup derived from the per-action executions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ErrorSummary {
    pub has_error: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub failed_actions: usize,
    #[serde(default)]
    pub failed_action_ids: Vec<String>,
    #[serde(default)]
    pub error_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency_diagnostic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_diagnostic: Option<String>,
}

/// Playability and size facts about the raw demo recording.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ArtifactSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_demo_path: Option<String>,
    #[serde(default)]
    pub raw_demo_size_bytes: u64,
    #[serde(default)]
    pub raw_demo_duration_ms: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_demo_playable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_codec: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_codec: Option<String>,
}

/// Trace/screenshot paths captured for post-hoc debugging.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DebugArtifacts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_path: Option<String>,
    #[serde(default)]
    pub screenshot_paths: Vec<String>,
}

/// The encode profile used to transcode the browser recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RecordingProfile {
    pub container: String,
    pub video_codec: String,
    pub pixel_format: String,
    pub audio_codec: String,
    pub video_preset: String,
    pub fps: u32,
    pub movflags: String,
    pub width: u32,
    pub height: u32,
}

impl Default for RecordingProfile {
    fn default() -> Self {
        Self {
            container: "mp4".to_string(),
            video_codec: "libx264".to_string(),
            pixel_format: "yuv420p".to_string(),
            audio_codec: "aac".to_string(),
            video_preset: "veryfast".to_string(),
            fps: 30,
            movflags: "+faststart".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

/// Correlation keys linking a run to the job that triggered it and, for
/// unified runs, to the sibling render it preceded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Correlation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue_job_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unified_run_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub render_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub render_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_video_path: Option<String>,
}

/// Dependency probe results attached to a run (queue/tts/browser).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DependencyStatus {
    pub ok: bool,
    #[serde(default)]
    pub python_package_ok: bool,
    #[serde(default)]
    pub browser_ok: bool,
    #[serde(default)]
    pub error: String,
    pub execution_mode: String,
    pub required: bool,
}

/// One append-only entry in `demo.runs`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DemoRunRecord {
    pub run_id: String,
    pub created_at: String,
    pub mode: DemoRunMode,
    pub execution_mode: DemoCaptureExecutionMode,
    pub actions_total: usize,
    pub actions_executed: usize,
    pub stage_timings_ms: std::collections::HashMap<String, i64>,
    pub drift_stats: DriftStats,
    pub execution_summary: ExecutionSummary,
    pub error_summary: ErrorSummary,
    pub artifact_summary: ArtifactSummary,
    pub debug_artifacts: DebugArtifacts,
    pub recording_profile: RecordingProfile,
    pub correlation: Correlation,
    pub dependency_status: DependencyStatus,
}
