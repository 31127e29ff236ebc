//! Parser for the lightweight `[mm:ss] text` / `[hh:mm:ss] text` narration
//! script format.

use once_cell::sync::Lazy;
use regex::Regex;
use vo_models::NarrationEvent;

use crate::error::{TimelineImportError, TimelineResult};

/// `[mm:ss]` or `[hh:mm:ss]` followed by the narration line.
static TIMESTAMPED_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[(?:(\d{1,2}):)?(\d{1,2}):(\d{2})\]\s*(.+?)\s*$")
        .expect("static timestamped-line regex is valid")
});

fn parse_timestamp(hours: Option<&str>, minutes: &str, seconds: &str) -> i64 {
    let h: i64 = hours.and_then(|s| s.parse().ok()).unwrap_or(0);
    let m: i64 = minutes.parse().unwrap_or(0);
    let s: i64 = seconds.parse().unwrap_or(0);
    (h * 3600 + m * 60 + s) * 1000
}

/// Parse a timestamped narration script. Blank lines are ignored. Every
/// non-blank line must match `[mm:ss] text` (or its `hh:mm:ss` variant);
/// anything else is rejected with the originating line number.
pub fn parse_timestamped_txt(content: &str) -> TimelineResult<Vec<NarrationEvent>> {
    let mut events = Vec::new();

    for (idx, raw_line) in content.lines().enumerate() {
        let line_number = idx + 1;
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        let caps = TIMESTAMPED_LINE_RE.captures(line).ok_or_else(|| {
            TimelineImportError::at_line(
                format!("expected `[mm:ss] text`, found {line:?}"),
                line_number,
                "invalid_timestamped_line",
            )
        })?;

        let start_ms = parse_timestamp(caps.get(1).map(|m| m.as_str()), &caps[2], &caps[3]);
        let text = caps[4].trim().to_string();
        if text.is_empty() {
            return Err(TimelineImportError::at_line(
                "narration line has no text after the timestamp",
                line_number,
                "empty_text",
            ));
        }

        events.push(NarrationEvent {
            id: format!("line_{line_number}"),
            start_ms,
            // end_ms is inferred by the normalizer from the next cue's start.
            end_ms: start_ms,
            text,
            voice_profile_id: None,
            meta: Default::default(),
        });
    }

    if events.is_empty() {
        return Err(TimelineImportError::new(
            "timestamped script contained no narration lines",
            "empty_input",
        ));
    }

    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mm_ss_lines() {
        let input = "[00:01] Hello\n[01:30] World\n";
        let events = parse_timestamped_txt(input).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].start_ms, 1_000);
        assert_eq!(events[1].start_ms, 90_000);
        assert_eq!(events[1].text, "World");
    }

    #[test]
    fn parses_hh_mm_ss_lines() {
        let input = "[01:02:03] Hi there\n";
        let events = parse_timestamped_txt(input).unwrap();
        assert_eq!(events[0].start_ms, (3_723) * 1000);
    }

    #[test]
    fn rejects_malformed_line() {
        let err = parse_timestamped_txt("not a timestamp\n").unwrap_err();
        assert_eq!(err.code, "invalid_timestamped_line");
        assert_eq!(err.line_number, Some(1));
    }

    #[test]
    fn rejects_empty_input() {
        let err = parse_timestamped_txt("\n\n").unwrap_err();
        assert_eq!(err.code, "empty_input");
    }
}
