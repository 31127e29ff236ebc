//! Format detection and top-level import entry point: turns an uploaded
//! narration script (SRT, timestamped text, or a raw canonical JSON
//! document) into a normalized, validated `Timeline`.

use serde_json::Value;
use vo_models::{ActionEvent, Timeline, TIMELINE_VERSION};

use crate::error::{TimelineImportError, TimelineResult};
use crate::normalizer::normalize_narration_events;
use crate::parsers_srt::parse_srt;
use crate::parsers_timestamped_txt::parse_timestamped_txt;
use crate::validator::validate_timeline_json;

/// The three narration-script shapes the importer accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Srt,
    TimestampedTxt,
    Json,
}

/// Detect which format `content` is in. The filename extension is trusted
/// first; when it's absent or unrecognized, the content itself is sniffed.
pub fn detect_import_format(filename: Option<&str>, content: &str) -> TimelineResult<ImportFormat> {
    if let Some(name) = filename {
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".srt") {
            return Ok(ImportFormat::Srt);
        }
        if lower.ends_with(".json") {
            return Ok(ImportFormat::Json);
        }
        if lower.ends_with(".txt") {
            return Ok(ImportFormat::TimestampedTxt);
        }
    }

    let trimmed = content.trim_start();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return Ok(ImportFormat::Json);
    }

    let first_non_blank = content.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    if first_non_blank
        .trim()
        .chars()
        .all(|c| c.is_ascii_digit())
        && !first_non_blank.trim().is_empty()
    {
        return Ok(ImportFormat::Srt);
    }
    if content.lines().any(|l| l.trim_start().starts_with('[')) {
        return Ok(ImportFormat::TimestampedTxt);
    }

    Err(TimelineImportError::new(
        "could not detect narration script format; expected .srt, .txt, or .json",
        "unsupported_format",
    ))
}

/// Import a narration script of unknown format and return a normalized,
/// validated `Timeline`.
pub fn import_timeline(filename: Option<&str>, content: &str) -> TimelineResult<Timeline> {
    let format = detect_import_format(filename, content)?;
    import_timeline_as(format, content)
}

/// Import with an already-known format, skipping detection.
pub fn import_timeline_as(format: ImportFormat, content: &str) -> TimelineResult<Timeline> {
    match format {
        ImportFormat::Srt => {
            let events = normalize_narration_events(parse_srt(content)?);
            Ok(Timeline {
                timeline_version: TIMELINE_VERSION.to_string(),
                narration_events: events,
                action_events: Vec::new(),
            })
        }
        ImportFormat::TimestampedTxt => {
            let events = normalize_narration_events(parse_timestamped_txt(content)?);
            Ok(Timeline {
                timeline_version: TIMELINE_VERSION.to_string(),
                narration_events: events,
                action_events: Vec::new(),
            })
        }
        ImportFormat::Json => {
            let value: Value = serde_json::from_str(content)
                .map_err(|e| TimelineImportError::new(format!("invalid JSON: {e}"), "invalid_json"))?;
            let mut timeline = validate_timeline_json(&value)?;
            timeline.narration_events = normalize_narration_events(timeline.narration_events);
            timeline.action_events = normalize_action_events(timeline.action_events);
            Ok(timeline)
        }
    }
}

/// Sort action events by `(at_ms, source order)` and stamp `source_index`
/// so later components can break ties deterministically.
fn normalize_action_events(mut events: Vec<ActionEvent>) -> Vec<ActionEvent> {
    for (i, event) in events.iter_mut().enumerate() {
        event.source_index = i;
    }
    events.sort_by(|a, b| a.at_ms.cmp(&b.at_ms).then(a.source_index.cmp(&b.source_index)));
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_srt_by_extension() {
        let fmt = detect_import_format(Some("script.srt"), "1\n00:00:01,000 --> 00:00:02,000\nHi\n").unwrap();
        assert_eq!(fmt, ImportFormat::Srt);
    }

    #[test]
    fn detects_json_by_sniffing_content() {
        let fmt = detect_import_format(None, "{\"timeline_version\":\"1.0\"}").unwrap();
        assert_eq!(fmt, ImportFormat::Json);
    }

    #[test]
    fn detects_timestamped_txt_by_sniffing_content() {
        let fmt = detect_import_format(None, "[00:01] hello\n").unwrap();
        assert_eq!(fmt, ImportFormat::TimestampedTxt);
    }

    #[test]
    fn rejects_unrecognizable_content() {
        let err = detect_import_format(None, "just some prose").unwrap_err();
        assert_eq!(err.code, "unsupported_format");
    }

    #[test]
    fn imports_srt_end_to_end() {
        let timeline = import_timeline(
            Some("a.srt"),
            "1\n00:00:01,000 --> 00:00:03,000\nHello\n\n2\n00:00:03,500 --> 00:00:05,000\nWorld\n",
        )
        .unwrap();
        assert_eq!(timeline.narration_events.len(), 2);
        assert_eq!(timeline.action_events.len(), 0);
    }

    #[test]
    fn imports_json_and_sorts_actions() {
        let raw = serde_json::json!({
            "timeline_version": "1.0",
            "narration_events": [],
            "action_events": [
                { "id": "a2", "at_ms": 2000, "action": "click" },
                { "id": "a1", "at_ms": 1000, "action": "goto" }
            ]
        })
        .to_string();
        let timeline = import_timeline_as(ImportFormat::Json, &raw).unwrap();
        assert_eq!(timeline.action_events[0].id, "a1");
        assert_eq!(timeline.action_events[1].id, "a2");
    }
}
