//! JSON Schema (Draft 2020-12) structural validation plus the cross-field
//! invariants the schema itself cannot express (uniqueness, ordering).

use std::collections::HashSet;

use jsonschema::{Draft, JSONSchema};
use once_cell::sync::Lazy;
use serde_json::Value;
use vo_models::Timeline;

use crate::error::{TimelineImportError, TimelineResult};

/// The canonical timeline document schema. Field-level shape only; cross-
/// field rules (duplicate ids, inverted ranges) are checked separately
/// because JSON Schema expresses them awkwardly at best.
pub const TIMELINE_SCHEMA_JSON: &str = r#"
{
  "$schema": "https://json-schema.org/draft/2020-12/schema",
  "type": "object",
  "required": ["timeline_version", "narration_events", "action_events"],
  "properties": {
    "timeline_version": { "type": "string" },
    "narration_events": {
      "type": "array",
      "items": {
        "type": "object",
        "required": ["id", "start_ms", "end_ms", "text"],
        "properties": {
          "id": { "type": "string", "minLength": 1 },
          "start_ms": { "type": "integer", "minimum": 0 },
          "end_ms": { "type": "integer", "minimum": 0 },
          "text": { "type": "string" },
          "voice_profile_id": { "type": ["string", "null"] },
          "meta": { "type": "object" }
        }
      }
    },
    "action_events": {
      "type": "array",
      "items": {
        "type": "object",
        "required": ["id", "at_ms", "action"],
        "properties": {
          "id": { "type": "string", "minLength": 1 },
          "at_ms": { "type": "integer", "minimum": 0 },
          "action": { "type": "string", "minLength": 1 },
          "target": { "type": ["string", "null"] },
          "args": { "type": "object" },
          "timeout_ms": { "type": ["integer", "null"] },
          "retries": { "type": ["integer", "null"] }
        }
      }
    }
  }
}
"#;

static COMPILED_SCHEMA: Lazy<JSONSchema> = Lazy::new(|| {
    let schema_value: Value =
        serde_json::from_str(TIMELINE_SCHEMA_JSON).expect("embedded timeline schema is valid JSON");
    JSONSchema::options()
        .with_draft(Draft::Draft202012)
        .compile(&schema_value)
        .expect("embedded timeline schema compiles")
});

/// Validate a raw JSON payload against the timeline schema, then decode it
/// into the canonical `Timeline` model and check cross-field invariants.
pub fn validate_timeline_json(payload: &Value) -> TimelineResult<Timeline> {
    if let Err(mut errors) = COMPILED_SCHEMA.validate(payload) {
        let first = errors.next().map(|e| e.to_string()).unwrap_or_else(|| "schema validation failed".to_string());
        return Err(TimelineImportError::new(first, "invalid_timeline_schema"));
    }

    let timeline: Timeline = serde_json::from_value(payload.clone())
        .map_err(|e| TimelineImportError::new(format!("malformed timeline document: {e}"), "invalid_json_type"))?;

    validate_cross_field(&timeline)?;
    Ok(timeline)
}

/// Invariants the JSON Schema cannot express on its own: unique event ids
/// (narration and action ids share one namespace), and `end_ms > start_ms`
/// for every narration event.
pub fn validate_cross_field(timeline: &Timeline) -> TimelineResult<()> {
    let mut seen_ids: HashSet<&str> = HashSet::new();

    for event in &timeline.narration_events {
        if !seen_ids.insert(event.id.as_str()) {
            return Err(TimelineImportError::new(
                format!("duplicate event id {:?}", event.id),
                "invalid_event",
            ));
        }
        if event.end_ms <= event.start_ms {
            return Err(TimelineImportError::new(
                format!("narration event {:?} has end_ms <= start_ms", event.id),
                "invalid_time_range",
            ));
        }
        if event.text.trim().is_empty() {
            return Err(TimelineImportError::new(
                format!("narration event {:?} has empty text", event.id),
                "empty_text",
            ));
        }
    }

    for event in &timeline.action_events {
        if !seen_ids.insert(event.id.as_str()) {
            return Err(TimelineImportError::new(
                format!("duplicate event id {:?}", event.id),
                "invalid_event",
            ));
        }
        if event.at_ms < 0 {
            return Err(TimelineImportError::new(
                format!("action event {:?} has a negative at_ms", event.id),
                "invalid_event",
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_minimal_valid_document() {
        let payload = json!({
            "timeline_version": "1.0",
            "narration_events": [
                { "id": "n1", "start_ms": 0, "end_ms": 1000, "text": "hi" }
            ],
            "action_events": []
        });
        let timeline = validate_timeline_json(&payload).unwrap();
        assert_eq!(timeline.narration_events.len(), 1);
    }

    #[test]
    fn rejects_schema_violation_missing_field() {
        let payload = json!({ "timeline_version": "1.0", "narration_events": [], "action_events": [] });
        assert!(validate_timeline_json(&payload).is_ok());

        let bad = json!({ "narration_events": [], "action_events": [] });
        let err = validate_timeline_json(&bad).unwrap_err();
        assert_eq!(err.code, "invalid_timeline_schema");
    }

    #[test]
    fn rejects_duplicate_ids_across_narration_and_action() {
        let payload = json!({
            "timeline_version": "1.0",
            "narration_events": [{ "id": "dup", "start_ms": 0, "end_ms": 1000, "text": "hi" }],
            "action_events": [{ "id": "dup", "at_ms": 500, "action": "click" }]
        });
        let err = validate_timeline_json(&payload).unwrap_err();
        assert_eq!(err.code, "invalid_event");
    }

    #[test]
    fn rejects_inverted_time_range() {
        let payload = json!({
            "timeline_version": "1.0",
            "narration_events": [{ "id": "n1", "start_ms": 1000, "end_ms": 500, "text": "hi" }],
            "action_events": []
        });
        let err = validate_timeline_json(&payload).unwrap_err();
        assert_eq!(err.code, "invalid_time_range");
    }
}
