//! The Project document: one per source video, persisted as a single JSON
//! file and mutated through default-filling migration (see `vo-storage`).

use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::demo::{DemoCaptureExecutionMode, DemoRunRecord};
use crate::render::RenderRecord;
use crate::timeline::Timeline;
use crate::tts::TTSProfile;

/// Current schema version stamped on every project document.
pub const SCHEMA_VERSION: &str = "2.0.0";

/// Facts about the uploaded source video, captured at project creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SourceVideo {
    pub path: String,
    pub sha256: String,
    pub duration_ms: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fps: Option<f64>,
    #[serde(default)]
    pub has_audio: bool,
}

/// Narration pacing defaults used by legacy segment generation; carried
/// through migration for fidelity even though the segment pipeline itself
/// is out of scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NarrationSettings {
    pub wps: f64,
    pub min_words: u32,
    pub max_words: u32,
}

impl Default for NarrationSettings {
    fn default() -> Self {
        Self {
            wps: 2.25,
            min_words: 4,
            max_words: 28,
        }
    }
}

/// Free-form per-project settings bag.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ProjectSettings {
    #[serde(default)]
    pub demo_context: String,
    #[serde(default)]
    pub demo_capture_execution_mode: DemoCaptureExecutionMode,
    #[serde(default = "default_narration_mode")]
    pub narration_mode: String,
    #[serde(default)]
    pub narration: NarrationSettings,
    /// Legacy segmentation/model selection bags, kept opaque for migration
    /// round-tripping; no pipeline reads them.
    #[serde(default)]
    pub segmentation: HashMap<String, Value>,
    #[serde(default)]
    pub models: HashMap<String, Value>,
    #[serde(default)]
    pub tts_endpoint: Option<String>,
}

fn default_narration_mode() -> String {
    "tts_only".to_string()
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            demo_context: String::new(),
            demo_capture_execution_mode: DemoCaptureExecutionMode::default(),
            narration_mode: default_narration_mode(),
            narration: NarrationSettings::default(),
            segmentation: HashMap::new(),
            models: HashMap::new(),
            tts_endpoint: None,
        }
    }
}

/// Bounded, append-only render history.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct Renders {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_render_id: Option<String>,
    #[serde(default)]
    pub history: Vec<RenderRecord>,
}

/// Bounded, append-only demo-run history.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct DemoState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_run_id: Option<String>,
    #[serde(default)]
    pub runs: Vec<DemoRunRecord>,
}

/// Final artifact paths and rendering provenance.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct Exports {
    #[serde(default)]
    pub artifacts: HashMap<String, String>,
    #[serde(default)]
    pub ffmpeg_commands: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_complex_script_path: Option<String>,
}

/// The root document: one per source video.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Project {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    pub project_id: String,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub source: ProjectSource,
    #[serde(default)]
    pub settings: ProjectSettings,
    #[serde(default)]
    pub timeline: Timeline,
    #[serde(default)]
    pub tts_profiles: HashMap<String, TTSProfile>,
    #[serde(default)]
    pub renders: Renders,
    #[serde(default)]
    pub demo: DemoState,
    #[serde(default)]
    pub exports: Exports,
    /// Written by `PATCH /settings`; legacy planning-status marker.
    #[serde(default)]
    pub planning: HashMap<String, Value>,
}

fn default_schema_version() -> String {
    SCHEMA_VERSION.to_string()
}

/// Wraps the single `video` source field so the JSON shape matches
/// `source.video.*` as specified.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ProjectSource {
    #[serde(default)]
    pub video: SourceVideo,
}

impl Project {
    /// Build a brand-new project document for a freshly uploaded video.
    pub fn new(project_id: impl Into<String>, now: impl Into<String>, video: SourceVideo) -> Self {
        let now = now.into();
        let mut tts_profiles = HashMap::new();
        tts_profiles.insert("default".to_string(), TTSProfile::default_profile());

        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            project_id: project_id.into(),
            created_at: now.clone(),
            updated_at: now,
            source: ProjectSource { video },
            settings: ProjectSettings::default(),
            timeline: Timeline::empty(),
            tts_profiles,
            renders: Renders::default(),
            demo: DemoState::default(),
            exports: Exports::default(),
            planning: HashMap::new(),
        }
    }
}
