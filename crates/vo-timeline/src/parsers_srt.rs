//! SRT subtitle parsing into narration events.

use once_cell::sync::Lazy;
use regex::Regex;
use vo_models::NarrationEvent;

use crate::error::{TimelineImportError, TimelineResult};

/// `HH:MM:SS,mmm --> HH:MM:SS,mmm`. Accepts `.` as well as `,` before the
/// milliseconds, since hand-edited SRT files mix both.
static TIMESTAMP_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<sh>\d{1,2}):(?P<sm>\d{2}):(?P<ss>\d{2})[,.](?P<sms>\d{1,3})\s*-->\s*(?P<eh>\d{1,2}):(?P<em>\d{2}):(?P<es>\d{2})[,.](?P<ems>\d{1,3})",
    )
    .expect("static SRT timestamp regex is valid")
});

static INDEX_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").expect("static regex is valid"));

fn parse_srt_timestamp(h: &str, m: &str, s: &str, ms: &str) -> i64 {
    let h: i64 = h.parse().unwrap_or(0);
    let m: i64 = m.parse().unwrap_or(0);
    let s: i64 = s.parse().unwrap_or(0);
    let ms_digits = ms.len();
    let mut ms_value: i64 = ms.parse().unwrap_or(0);
    if ms_digits == 1 {
        ms_value *= 100;
    } else if ms_digits == 2 {
        ms_value *= 10;
    }
    ((h * 3600 + m * 60 + s) * 1000) + ms_value
}

/// Parse an SRT document into narration events. Cue index lines are
/// accepted but not required; text blocks are everything between the
/// timestamp line and the next blank line (or end of input).
pub fn parse_srt(content: &str) -> TimelineResult<Vec<NarrationEvent>> {
    let lines: Vec<&str> = content.lines().collect();
    let mut events = Vec::new();
    let mut cue_number = 0usize;
    let mut i = 0usize;

    while i < lines.len() {
        let line = lines[i].trim();
        if line.is_empty() {
            i += 1;
            continue;
        }

        if INDEX_LINE_RE.is_match(line) {
            i += 1;
            if i >= lines.len() {
                return Err(TimelineImportError::at_line(
                    "expected a timestamp line after cue index",
                    i,
                    "missing_timestamp",
                ));
            }
        }

        let ts_line_no = i + 1;
        let ts_line = lines[i].trim();
        let caps = TIMESTAMP_LINE_RE.captures(ts_line).ok_or_else(|| {
            TimelineImportError::at_line(
                format!("expected an SRT timestamp line, found {ts_line:?}"),
                ts_line_no,
                "invalid_srt_timestamp",
            )
        })?;
        i += 1;

        let start_ms = parse_srt_timestamp(&caps["sh"], &caps["sm"], &caps["ss"], &caps["sms"]);
        let end_ms = parse_srt_timestamp(&caps["eh"], &caps["em"], &caps["es"], &caps["ems"]);
        if end_ms <= start_ms {
            return Err(TimelineImportError::at_line(
                "cue end time must be after its start time",
                ts_line_no,
                "invalid_time_range",
            ));
        }

        let mut text_lines = Vec::new();
        while i < lines.len() && !lines[i].trim().is_empty() {
            text_lines.push(lines[i].trim());
            i += 1;
        }
        let text = text_lines.join(" ").trim().to_string();
        if text.is_empty() {
            return Err(TimelineImportError::at_line(
                "cue has no narration text",
                ts_line_no,
                "empty_text",
            ));
        }

        cue_number += 1;
        events.push(NarrationEvent {
            id: format!("srt_{cue_number}"),
            start_ms,
            end_ms,
            text,
            voice_profile_id: None,
            meta: Default::default(),
        });
    }

    if events.is_empty() {
        return Err(TimelineImportError::new("SRT input contained no cues", "empty_input"));
    }

    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_basic_srt() {
        let input = "1\n00:00:01,000 --> 00:00:04,000\nHello there\n\n2\n00:00:04,500 --> 00:00:06,000\nSecond line\n";
        let events = parse_srt(input).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].start_ms, 1_000);
        assert_eq!(events[0].end_ms, 4_000);
        assert_eq!(events[0].text, "Hello there");
        assert_eq!(events[1].start_ms, 4_500);
    }

    #[test]
    fn accepts_dot_separator() {
        let input = "1\n00:00:01.000 --> 00:00:02.000\nHi\n";
        let events = parse_srt(input).unwrap();
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn rejects_inverted_time_range() {
        let input = "1\n00:00:05,000 --> 00:00:02,000\nBad\n";
        let err = parse_srt(input).unwrap_err();
        assert_eq!(err.code, "invalid_time_range");
    }

    #[test]
    fn rejects_empty_input() {
        let err = parse_srt("").unwrap_err();
        assert_eq!(err.code, "empty_input");
    }
}
