//! TTS profile resolution and parameter merging.

use vo_models::{Project, TTSParams, TTSProfile};

use crate::error::{TtsError, TtsResult};

/// Look up a profile by id, falling back to `"default"` when a narration
/// event doesn't name one.
pub fn resolve_profile<'a>(project: &'a Project, profile_id: Option<&str>) -> TtsResult<&'a TTSProfile> {
    let id = profile_id.unwrap_or("default");
    project
        .tts_profiles
        .get(id)
        .ok_or_else(|| TtsError::UnknownProfile(id.to_string()))
}

/// Insert or replace a profile on the project.
pub fn upsert_profile(project: &mut Project, profile: TTSProfile) {
    project.tts_profiles.insert(profile.profile_id.clone(), profile);
}

/// Merge synthesis params: explicit per-request overrides win over the
/// profile's own params.
pub fn merge_params(profile_params: &TTSParams, overrides: &TTSParams) -> TTSParams {
    let mut merged = profile_params.clone();
    for (key, value) in overrides {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use vo_models::SourceVideo;

    #[test]
    fn resolves_default_profile_when_none_named() {
        let project = Project::new("p1", "2026-01-01T00:00:00Z", SourceVideo::default());
        let profile = resolve_profile(&project, None).unwrap();
        assert_eq!(profile.profile_id, "default");
    }

    #[test]
    fn unknown_profile_id_errors() {
        let project = Project::new("p1", "2026-01-01T00:00:00Z", SourceVideo::default());
        let err = resolve_profile(&project, Some("nope")).unwrap_err();
        assert!(matches!(err, TtsError::UnknownProfile(_)));
    }

    #[test]
    fn overrides_win_over_profile_params() {
        let profile = TTSProfile::default_profile();
        let mut overrides = TTSParams::new();
        overrides.insert("speed_factor".to_string(), serde_json::json!(1.5));
        let merged = merge_params(&profile.params, &overrides);
        assert_eq!(merged["speed_factor"], serde_json::json!(1.5));
        assert_eq!(merged["temperature"], profile.params["temperature"]);
    }
}
