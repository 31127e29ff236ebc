//! Named TTS voice profiles.

use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How a profile selects a voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum VoiceMode {
    PredefinedVoice,
    ReferenceAudio,
}

impl Default for VoiceMode {
    fn default() -> Self {
        Self::PredefinedVoice
    }
}

/// Free-form synthesis parameters merged project defaults <- profile <-
/// explicit override. Kept as a JSON bag because the TTS endpoint's
/// parameter set is provider-specific (speed_factor, temperature,
/// exaggeration, cfg_weight, seed, language_id, output_format, ...).
pub type TTSParams = HashMap<String, Value>;

/// A named voice configuration stored on a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TTSProfile {
    pub profile_id: String,
    pub display_name: String,
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub voice_mode: VoiceMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predefined_voice_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_prompt_path: Option<String>,
    #[serde(default)]
    pub params: TTSParams,
}

fn default_provider() -> String {
    "chatterbox".to_string()
}

impl TTSProfile {
    /// The `default` profile every project is seeded with.
    pub fn default_profile() -> Self {
        let mut params: TTSParams = HashMap::new();
        params.insert("speed_factor".to_string(), Value::from(1.0));
        params.insert("temperature".to_string(), Value::from(0.8));
        params.insert("exaggeration".to_string(), Value::from(0.5));
        params.insert("cfg_weight".to_string(), Value::from(0.5));
        params.insert("seed".to_string(), Value::from(0));
        params.insert("language_id".to_string(), Value::from("en"));
        params.insert("output_format".to_string(), Value::from("wav"));

        Self {
            profile_id: "default".to_string(),
            display_name: "Default".to_string(),
            provider: default_provider(),
            endpoint: None,
            voice_mode: VoiceMode::PredefinedVoice,
            predefined_voice_id: Some("alloy".to_string()),
            audio_prompt_path: None,
            params,
        }
    }
}
