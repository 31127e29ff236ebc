//! TTS Render Pipeline result records, as persisted in `renders.history`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::demo::Correlation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RenderStatus {
    Completed,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    TtsOnly,
    Unified,
}

impl RenderMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TtsOnly => "tts_only",
            Self::Unified => "unified",
        }
    }
}

/// Per-stage wall-clock timings recorded on every render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StageTimings {
    pub tts_ms: i64,
    pub mix_mux_ms: i64,
    pub total_ms: i64,
}

/// One append-only entry in `renders.history`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RenderRecord {
    pub render_id: String,
    pub created_at: String,
    pub status: RenderStatus,
    pub mode: RenderMode,
    pub segments: usize,
    pub cache_hits: usize,
    pub generated_segments: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_mp4_path: Option<String>,
    pub source_video_path: String,
    pub stage_timings_ms: StageTimings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub correlation: Correlation,
}
