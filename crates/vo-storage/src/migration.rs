//! Default-filling migration: every project loaded from disk passes
//! through here before it is handed to a caller, so older documents pick
//! up fields added by later schema revisions without a one-shot batch
//! migration step.

use vo_models::{Project, SCHEMA_VERSION};

use crate::history::clamp_to_hard_ceiling;

/// Idempotent: running this twice on the same project is a no-op. Most
/// field-level defaults are already handled by `#[serde(default)]` during
/// deserialization; this function covers what serde can't — stamping the
/// current schema version and bounding history lists that predate the
/// trimming introduced by [`crate::history`].
pub fn ensure_project_defaults(project: &mut Project) {
    if project.schema_version.is_empty() {
        project.schema_version = SCHEMA_VERSION.to_string();
    }

    clamp_to_hard_ceiling(&mut project.renders.history);
    clamp_to_hard_ceiling(&mut project.demo.runs);

    if project.tts_profiles.is_empty() {
        project
            .tts_profiles
            .insert("default".to_string(), vo_models::TTSProfile::default_profile());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vo_models::SourceVideo;

    #[test]
    fn is_idempotent() {
        let mut project = Project::new("p1", "2026-01-01T00:00:00Z", SourceVideo::default());
        ensure_project_defaults(&mut project);
        let first = serde_json::to_string(&project).unwrap();
        ensure_project_defaults(&mut project);
        let second = serde_json::to_string(&project).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn restores_missing_schema_version() {
        let mut project = Project::new("p1", "2026-01-01T00:00:00Z", SourceVideo::default());
        project.schema_version.clear();
        ensure_project_defaults(&mut project);
        assert_eq!(project.schema_version, SCHEMA_VERSION);
    }
}
