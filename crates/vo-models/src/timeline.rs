//! Canonical timeline model: narration events and browser-action events.

use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Version stamp carried on every canonical timeline document.
pub const TIMELINE_VERSION: &str = "1.0";

/// A line of voice-over bound to a time interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NarrationEvent {
    pub id: String,
    pub start_ms: i64,
    pub end_ms: i64,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_profile_id: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub meta: HashMap<String, Value>,
}

/// A scripted browser action on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ActionEvent {
    pub id: String,
    pub at_ms: i64,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub args: HashMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retries: Option<i64>,
    /// Position in the original, unsorted input; used to break ties when two
    /// actions share `at_ms` (source order wins).
    #[serde(default)]
    pub source_index: usize,
}

/// The canonical timeline document stored on a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Timeline {
    pub timeline_version: String,
    #[serde(default)]
    pub narration_events: Vec<NarrationEvent>,
    #[serde(default)]
    pub action_events: Vec<ActionEvent>,
}

impl Timeline {
    /// An empty timeline stamped with the current version.
    pub fn empty() -> Self {
        Self {
            timeline_version: TIMELINE_VERSION.to_string(),
            narration_events: Vec::new(),
            action_events: Vec::new(),
        }
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::empty()
    }
}
